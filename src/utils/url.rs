// src/utils/url.rs

//! URL building utilities for Canvas links.

/// Percent-encode spaces, leaving every other character as-is.
///
/// Canvas folder names appear verbatim in file preview links; only spaces
/// break Discord's link parsing.
///
/// # Examples
/// ```
/// use coursewatch::utils::url::encode_spaces;
///
/// assert_eq!(encode_spaces("Lecture Notes"), "Lecture%20Notes");
/// ```
pub fn encode_spaces(url: &str) -> String {
    url.replace(' ', "%20")
}

/// Course root, e.g. `https://canvas.example.edu/courses/42`.
pub fn course_url(base: &str, course_id: u64) -> String {
    format!("{}/courses/{}", base.trim_end_matches('/'), course_id)
}

/// Preview link for a file inside a named course folder.
///
/// # Examples
/// ```
/// use coursewatch::utils::url::file_preview_url;
///
/// assert_eq!(
///     file_preview_url("https://canvas.example.edu", 42, "Lecture Notes", 7),
///     "https://canvas.example.edu/courses/42/files/folder/Lecture%20Notes?preview=7"
/// );
/// ```
pub fn file_preview_url(base: &str, course_id: u64, folder_name: &str, file_id: u64) -> String {
    encode_spaces(&format!(
        "{}/files/folder/{}?preview={}",
        course_url(base, course_id),
        folder_name,
        file_id
    ))
}

/// The course's assignment list.
pub fn assignments_url(base: &str, course_id: u64) -> String {
    format!("{}/assignments", course_url(base, course_id))
}

/// REST endpoint for a course collection, e.g. `.../api/v1/courses/42/files`.
pub fn course_api_url(base: &str, course_id: u64, collection: &str) -> String {
    format!(
        "{}/api/v1/courses/{}/{}",
        base.trim_end_matches('/'),
        course_id,
        collection
    )
}

/// Extract the `rel="next"` target from a Canvas `Link` header.
///
/// # Examples
/// ```
/// use coursewatch::utils::url::next_page_link;
///
/// let header = r#"<https://x/api/v1/courses/1/files?page=1>; rel="current",<https://x/api/v1/courses/1/files?page=2>; rel="next""#;
/// assert_eq!(
///     next_page_link(header),
///     Some("https://x/api/v1/courses/1/files?page=2".to_string())
/// );
/// ```
pub fn next_page_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|p| {
            let p = p.trim();
            p == r#"rel="next""# || p == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}
