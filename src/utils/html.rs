/// Strip dangerous markup from user-supplied free text before it is stored.
///
/// Whitelist-based: safe inline tags survive, anything like <script> or
/// event-handler attributes is removed. Applied to post text, comment text
/// and profile bios on the way in.
pub fn sanitize_text(input: &str) -> String {
    ammonia::clean(input)
}
