//! Display labels for dotted content-type references.

/// Turn a dotted content reference into a display label.
///
/// Takes the final dot-separated segment, capitalizes its first letter,
/// and inserts a space before each remaining uppercase letter:
/// `"chat.chatroom"` becomes `"Chatroom"`, a camel-cased kind like
/// `"lessons.slideshowSlide"` becomes `"Slideshow Slide"`.
///
/// Pure and total; the empty string maps to the empty string.
pub fn content_type_label(content_type: &str) -> String {
    let kind = content_type.rsplit('.').next().unwrap_or(content_type);

    let mut label = String::with_capacity(kind.len() + 4);
    for (i, ch) in kind.chars().enumerate() {
        if i == 0 {
            label.extend(ch.to_uppercase());
        } else {
            if ch.is_uppercase() {
                label.push(' ');
            }
            label.push(ch);
        }
    }
    label
}
