pub const SPOTIFY_API: &str = "https://api.spotify.com/v1";
pub const YOUTUBE_API: &str = "https://www.googleapis.com/youtube/v3";

#[macro_export]
macro_rules! api_endpoint {
    ( $base: expr, $( $x: expr),+ ) => {{
        format!("{}{}", $base, format_args!($($x),+))
    }};
}
