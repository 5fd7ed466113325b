/// Derives the origin that replies from the bridge frame are expected to
/// carry, by dropping the last `/`-separated segment of the frame URL.
///
/// This matches the frame URL shape `https://host/page?connectionType`,
/// where the last segment is the query-bearing leaf. A bridge URL whose base
/// path has several segments yields a prefix that is not a bare origin;
/// known fragility, kept rather than silently changed.
pub fn origin_of(frame_url: &str) -> String {
    let mut parts: Vec<&str> = frame_url.split('/').collect();
    parts.pop();
    parts.join("/")
}
