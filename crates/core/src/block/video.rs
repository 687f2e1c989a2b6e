//! Rewriting hosted-video links into embeddable player URLs.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static YOUTUBE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtube(?:-nocookie)?\.com/(?:watch\?(?:[^#\s]*&)?v=|embed/|shorts/|live/|v/)|youtu\.be/)([^&?/#\s]+)",
    )
        .expect("youtube pattern is valid")
});

static VIMEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"vimeo\.com/(?:[^?#\s]*/)?(\d+)(?:[/?#]|$)").expect("vimeo pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoProvider {
    YouTube,
    Vimeo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlaybackFlags {
    pub autoplay: bool,
    #[serde(rename = "loop")]
    pub looped: bool,
    pub muted: bool,
}

fn bit(value: bool) -> u8 {
    u8::from(value)
}

impl VideoProvider {
    pub fn detect(url: &str) -> Option<Self> {
        if url.contains("youtube.com") || url.contains("youtu.be") {
            Some(VideoProvider::YouTube)
        } else if url.contains("vimeo.com") {
            Some(VideoProvider::Vimeo)
        } else {
            None
        }
    }

    pub fn video_id(&self, url: &str) -> Option<String> {
        let pattern = match self {
            VideoProvider::YouTube => &YOUTUBE_ID,
            VideoProvider::Vimeo => &VIMEO_ID,
        };
        pattern
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    pub fn embed_url(&self, video_id: &str, flags: PlaybackFlags) -> String {
        match self {
            VideoProvider::YouTube => format!(
                "https://www.youtube.com/embed/{video_id}?autoplay={}&loop={}&mute={}",
                bit(flags.autoplay),
                bit(flags.looped),
                bit(flags.muted)
            ),
            VideoProvider::Vimeo => format!(
                "https://player.vimeo.com/video/{video_id}?autoplay={}&loop={}&muted={}",
                bit(flags.autoplay),
                bit(flags.looped),
                bit(flags.muted)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAGS: PlaybackFlags = PlaybackFlags {
        autoplay: true,
        looped: true,
        muted: false,
    };

    #[test]
    fn short_youtube_link() {
        let url = "https://youtu.be/abc123";
        let provider = VideoProvider::detect(url).unwrap();
        let id = provider.video_id(url).unwrap();
        let embed = provider.embed_url(&id, FLAGS);
        assert!(embed.contains("youtube.com/embed/abc123"));
        assert!(embed.ends_with("autoplay=1&loop=1&mute=0"));
    }

    #[test]
    fn watch_link_with_extra_params() {
        let url = "https://www.youtube.com/watch?feature=share&v=XyZ_9&t=42";
        assert_eq!(VideoProvider::YouTube.video_id(url).as_deref(), Some("XyZ_9"));
    }

    #[test]
    fn vimeo_link() {
        let url = "https://vimeo.com/76979871";
        let provider = VideoProvider::detect(url).unwrap();
        assert_eq!(provider, VideoProvider::Vimeo);
        let embed = provider.embed_url(&provider.video_id(url).unwrap(), PlaybackFlags::default());
        assert_eq!(
            embed,
            "https://player.vimeo.com/video/76979871?autoplay=0&loop=0&muted=0"
        );
    }

    #[test]
    fn embed_and_shorts_links() {
        let yt = VideoProvider::YouTube;
        assert_eq!(
            yt.video_id("https://www.youtube.com/embed/dQw4w9WgXcQ?start=5").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(yt.video_id("https://youtube.com/shorts/Sh0rt_1").as_deref(), Some("Sh0rt_1"));
        assert_eq!(
            VideoProvider::Vimeo.video_id("https://vimeo.com/channels/staffpicks/76979871").as_deref(),
            Some("76979871")
        );
        assert_eq!(
            VideoProvider::Vimeo.video_id("https://player.vimeo.com/video/76979871?h=1").as_deref(),
            Some("76979871")
        );
    }

    #[test]
    fn plain_files_have_no_provider() {
        assert_eq!(VideoProvider::detect("https://cdn.example.com/intro.mp4"), None);
        assert_eq!(VideoProvider::YouTube.video_id("https://youtube.com/channel/x"), None);
    }
}
