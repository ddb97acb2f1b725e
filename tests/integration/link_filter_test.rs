// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use websift::domain::models::link_record::LinkKind;
use websift::domain::services::link_filter::filter_links;

#[test]
fn test_mixed_message() {
    let message = "Summarize https://www.youtube.com/watch?v=dQw4w9WgXcQ and \
                   youtu.be/abcdefghijk, then m.youtube.com/shorts/shortid0001 \
                   plus https://www.youtube.com/watch?v=dQw4w9WgXcQ again. \
                   Ignore https://vimeo.com/123456.";

    let links = filter_links(message);
    let found: Vec<_> = links
        .iter()
        .map(|link| (link.video_id.as_str(), link.kind))
        .collect();

    assert_eq!(
        found,
        vec![
            ("dQw4w9WgXcQ", LinkKind::Video),
            ("abcdefghijk", LinkKind::Video),
            ("shortid0001", LinkKind::Shorts),
        ]
    );
    assert_eq!(links[0].url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
}

#[test]
fn test_plain_text_has_no_links() {
    assert!(filter_links("what is the weather in Kolkata today?").is_empty());
    assert!(filter_links("https://example.com/watch?v=dQw4w9WgXcQ").is_empty());
    assert_eq!(filter_links("youtube.com/watch?v=dQw4w9WgXcQ").len(), 1);
}
