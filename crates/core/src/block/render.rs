//! Block dispatch: turns a stored [`PageBlock`] into a typed render tree.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::model::{sort_blocks, BlockKind, PageBlock};
use super::settings::{
    choice, flag, text, Alignment, ButtonVariant, CtaStyle, FontSize, QuoteStyle, SpacerHeight,
    Width,
};
use super::video::{PlaybackFlags, VideoProvider};
use crate::animation::{AnimationConfig, AnimationWrapper};
use crate::json::parse_object;
use crate::media::{is_script_url, MediaError, MediaResolver};
use crate::visibility::{is_visible_with_auth, AuthContext};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("media could not be resolved: {0}")]
    Media(#[from] MediaError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum VideoSource {
    Embed { provider: VideoProvider, url: String },
    File { url: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BlockNode {
    Text {
        text: String,
        alignment: Alignment,
        font_size: FontSize,
    },
    Image {
        src: String,
        alt: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        alignment: Alignment,
        width: Width,
    },
    Video {
        source: VideoSource,
        alignment: Alignment,
        width: Width,
        #[serde(flatten)]
        playback: PlaybackFlags,
    },
    Quote {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        author: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        role: Option<String>,
        alignment: Alignment,
        style: QuoteStyle,
    },
    Cta {
        headline: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
        button_text: String,
        button_link: String,
        alignment: Alignment,
        style: CtaStyle,
        button_variant: ButtonVariant,
    },
    Spacer {
        height: SpacerHeight,
    },
}

/// A rendered block together with its optional entrance animation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub block_id: i64,
    pub order: i32,
    pub node: BlockNode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationWrapper>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockAction {
    Retry,
    Remove,
}

/// Placeholder for a block that failed to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedBlock {
    pub block_id: i64,
    pub block_type: String,
    pub message: String,
    pub actions: Vec<BlockAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RenderedBlock {
    Ok(RenderNode),
    Failed(FailedBlock),
}

impl RenderedBlock {
    pub fn block_id(&self) -> i64 {
        match self {
            RenderedBlock::Ok(node) => node.block_id,
            RenderedBlock::Failed(failed) => failed.block_id,
        }
    }
}

/// Viewer state the page is rendered for.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub viewport_width: u32,
    pub now: DateTime<Utc>,
    pub auth: Option<AuthContext>,
}

impl RenderContext {
    pub fn new(viewport_width: u32, now: DateTime<Utc>) -> Self {
        Self {
            viewport_width,
            now,
            auth: None,
        }
    }
}

/// Render one block. `Ok(None)` for a block type outside the closed set.
pub fn render(block: &PageBlock, media: &dyn MediaResolver) -> Result<Option<RenderNode>, RenderError> {
    let Some(kind) = block.kind() else {
        tracing::debug!(block_id = block.id, block_type = %block.block_type, "skipping unknown block type");
        return Ok(None);
    };
    let settings = parse_object(&block.settings);
    let content = block.content.as_str();

    let node = match kind {
        BlockKind::Text => BlockNode::Text {
            text: content.to_string(),
            alignment: choice(&settings, "alignment", Alignment::Left),
            font_size: choice(&settings, "fontSize", FontSize::Medium),
        },
        BlockKind::Image => {
            let caption = text(&settings, "caption");
            let alt = text(&settings, "alt")
                .or_else(|| caption.clone())
                .unwrap_or_else(|| "Image".to_string());
            BlockNode::Image {
                src: media.resolve(content)?,
                alt,
                caption,
                alignment: choice(&settings, "alignment", Alignment::Center),
                width: choice(&settings, "width", Width::Large),
            }
        }
        BlockKind::Video => {
            let playback = PlaybackFlags {
                autoplay: flag(&settings, "autoplay"),
                looped: flag(&settings, "loop"),
                muted: flag(&settings, "muted"),
            };
            let url = media.resolve(content)?;
            // Hosted links without a recognisable id play as a plain file.
            let embed = VideoProvider::detect(&url)
                .and_then(|provider| provider.video_id(&url).map(|id| (provider, id)));
            let source = match embed {
                Some((provider, video_id)) => VideoSource::Embed {
                    provider,
                    url: provider.embed_url(&video_id, playback),
                },
                None => VideoSource::File { url },
            };
            BlockNode::Video {
                source,
                alignment: choice(&settings, "alignment", Alignment::Center),
                width: choice(&settings, "width", Width::Large),
                playback,
            }
        }
        BlockKind::Quote => BlockNode::Quote {
            text: content.to_string(),
            author: text(&settings, "author"),
            role: text(&settings, "role"),
            alignment: choice(&settings, "alignment", Alignment::Center),
            style: choice(&settings, "style", QuoteStyle::Default),
        },
        BlockKind::Cta => BlockNode::Cta {
            headline: content.to_string(),
            subtitle: text(&settings, "subtitle"),
            button_text: text(&settings, "buttonText").unwrap_or_else(|| "Learn More".to_string()),
            button_link: text(&settings, "buttonLink")
                .filter(|link| !is_script_url(link))
                .unwrap_or_else(|| "#".to_string()),
            alignment: choice(&settings, "alignment", Alignment::Center),
            style: choice(&settings, "style", CtaStyle::Default),
            button_variant: choice(&settings, "buttonVariant", ButtonVariant::Default),
        },
        BlockKind::Spacer => BlockNode::Spacer {
            height: choice(&settings, "height", SpacerHeight::Medium),
        },
    };

    Ok(Some(RenderNode {
        block_id: block.id,
        order: block.order,
        node,
        animation: AnimationConfig::parse(&block.animation).wrapper(),
    }))
}

/// Order, filter and render a page's blocks. A block that fails is replaced
/// by a [`FailedBlock`] placeholder; the rest of the page is unaffected.
pub fn render_page(
    blocks: &[PageBlock],
    ctx: &RenderContext,
    media: &dyn MediaResolver,
) -> Vec<RenderedBlock> {
    let mut ordered = blocks.to_vec();
    sort_blocks(&mut ordered);

    ordered
        .iter()
        .filter(|block| {
            is_visible_with_auth(&block.visibility, ctx.viewport_width, ctx.now, ctx.auth.as_ref())
        })
        .filter_map(|block| match render(block, media) {
            Ok(node) => node.map(RenderedBlock::Ok),
            Err(err) => {
                tracing::warn!(block_id = block.id, "block failed to render: {err}");
                Some(RenderedBlock::Failed(FailedBlock {
                    block_id: block.id,
                    block_type: block.block_type.clone(),
                    message: err.to_string(),
                    actions: vec![BlockAction::Retry, BlockAction::Remove],
                }))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationTrigger;
    use crate::media::BaseUrlMediaResolver;
    use chrono::TimeZone;

    fn block(id: i64, kind: &str, content: &str, settings: &str, order: i32) -> PageBlock {
        let now = Utc::now();
        PageBlock {
            id,
            page_id: 1,
            block_type: kind.to_string(),
            content: content.to_string(),
            settings: settings.to_string(),
            visibility: "{}".to_string(),
            animation: "{}".to_string(),
            order,
            created_at: now,
            updated_at: now,
        }
    }

    fn media() -> BaseUrlMediaResolver {
        BaseUrlMediaResolver::new("https://cdn.example.com")
    }

    fn ctx(width: u32) -> RenderContext {
        RenderContext::new(width, Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn every_known_type_renders() {
        let samples = [
            ("text", "Hello"),
            ("image", "/img/a.jpg"),
            ("video", "https://youtu.be/abc123"),
            ("quote", "Be kind"),
            ("cta", "Join us"),
            ("spacer", ""),
        ];
        for (i, (kind, content)) in samples.into_iter().enumerate() {
            let rendered = render(&block(i as i64, kind, content, "{}", 0), &media()).unwrap();
            assert!(rendered.is_some(), "{kind} should render");
        }
    }

    #[test]
    fn unknown_type_renders_nothing() {
        assert_eq!(render(&block(1, "carousel", "x", "{}", 0), &media()), Ok(None));
        assert_eq!(render(&block(1, "", "x", "{}", 0), &media()), Ok(None));
    }

    #[test]
    fn text_defaults_and_bad_settings() {
        let node = render(&block(1, "text", "Hi\nthere", "{oops", 0), &media())
            .unwrap()
            .unwrap();
        assert_eq!(
            node.node,
            BlockNode::Text {
                text: "Hi\nthere".to_string(),
                alignment: Alignment::Left,
                font_size: FontSize::Medium,
            }
        );
        assert!(node.animation.is_none());
    }

    #[test]
    fn image_alt_falls_back_to_caption() {
        let node = render(
            &block(1, "image", "uploads/a.jpg", r#"{"caption":"Team","width":"full","color":"red"}"#, 0),
            &media(),
        )
        .unwrap()
        .unwrap();
        match node.node {
            BlockNode::Image { src, alt, caption, width, alignment } => {
                assert_eq!(src, "https://cdn.example.com/uploads/a.jpg");
                assert_eq!(alt, "Team");
                assert_eq!(caption.as_deref(), Some("Team"));
                assert_eq!(width, Width::Full);
                assert_eq!(alignment, Alignment::Center);
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn youtube_video_becomes_embed() {
        let node = render(
            &block(1, "video", "https://youtu.be/abc123", r#"{"autoplay":true,"loop":true,"muted":false}"#, 0),
            &media(),
        )
        .unwrap()
        .unwrap();
        match node.node {
            BlockNode::Video { source: VideoSource::Embed { provider, url }, .. } => {
                assert_eq!(provider, VideoProvider::YouTube);
                assert!(url.contains("youtube.com/embed/abc123"));
                assert!(url.contains("autoplay=1&loop=1&mute=0"));
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn embed_style_links_are_recognised() {
        for (link, id) in [
            ("https://www.youtube.com/embed/dQw4w9WgXcQ", "dQw4w9WgXcQ"),
            ("https://youtube.com/shorts/Sh0rt_1", "Sh0rt_1"),
            ("https://vimeo.com/channels/staffpicks/76979871", "76979871"),
        ] {
            let node = render(&block(1, "video", link, "{}", 0), &media()).unwrap().unwrap();
            match node.node {
                BlockNode::Video { source: VideoSource::Embed { url, .. }, .. } => {
                    assert!(url.contains(id), "{link} -> {url}");
                }
                other => panic!("unexpected node for {link}: {other:?}"),
            }
        }
    }

    #[test]
    fn hosted_link_without_id_plays_as_file() {
        let link = "https://www.youtube.com/channel/abc";
        let node = render(&block(1, "video", link, "{}", 0), &media()).unwrap().unwrap();
        match node.node {
            BlockNode::Video { source: VideoSource::File { url }, .. } => assert_eq!(url, link),
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn direct_video_keeps_flags() {
        let node = render(&block(1, "video", "clips/intro.mp4", r#"{"muted":true}"#, 0), &media())
            .unwrap()
            .unwrap();
        match node.node {
            BlockNode::Video { source: VideoSource::File { url }, playback, .. } => {
                assert_eq!(url, "https://cdn.example.com/clips/intro.mp4");
                assert!(playback.muted);
                assert!(!playback.autoplay);
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn cta_defaults() {
        let node = render(&block(1, "cta", "Ready?", "{}", 0), &media()).unwrap().unwrap();
        match node.node {
            BlockNode::Cta { button_text, button_link, style, .. } => {
                assert_eq!(button_text, "Learn More");
                assert_eq!(button_link, "#");
                assert_eq!(style, CtaStyle::Default);
            }
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn cta_script_link_is_neutralised() {
        let node = render(
            &block(1, "cta", "Go", r#"{"buttonLink":"JavaScript:alert(1)"}"#, 0),
            &media(),
        )
        .unwrap()
        .unwrap();
        match node.node {
            BlockNode::Cta { button_link, .. } => assert_eq!(button_link, "#"),
            other => panic!("unexpected node {other:?}"),
        }

        let node = render(&block(2, "cta", "Go", r#"{"buttonLink":"/contact"}"#, 0), &media())
            .unwrap()
            .unwrap();
        match node.node {
            BlockNode::Cta { button_link, .. } => assert_eq!(button_link, "/contact"),
            other => panic!("unexpected node {other:?}"),
        }
    }

    #[test]
    fn animation_wraps_node() {
        let mut b = block(1, "quote", "Hi", r#"{"author":"Ana"}"#, 0);
        b.animation = r#"{"type":"fade-in","trigger":"on-hover"}"#.to_string();
        let node = render(&b, &media()).unwrap().unwrap();
        let wrapper = node.animation.unwrap();
        assert_eq!(wrapper.trigger, AnimationTrigger::OnHover);
        assert_eq!(wrapper.initial.transform, None);
    }

    #[test]
    fn page_renders_in_order() {
        let blocks = vec![
            block(2, "text", "Hi", "{}", 1),
            block(1, "spacer", "", r#"{"height":"large"}"#, 0),
        ];
        let rendered = render_page(&blocks, &ctx(1280), &media());
        assert_eq!(rendered.len(), 2);
        match &rendered[0] {
            RenderedBlock::Ok(node) => {
                assert_eq!(node.node, BlockNode::Spacer { height: SpacerHeight::Large });
                assert_eq!(SpacerHeight::Large.class(), "h-24");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(rendered[1].block_id(), 2);
    }

    #[test]
    fn equal_orders_keep_storage_order() {
        let blocks = vec![block(5, "text", "a", "{}", 0), block(3, "text", "b", "{}", 0)];
        let ids: Vec<i64> = render_page(&blocks, &ctx(1280), &media())
            .iter()
            .map(RenderedBlock::block_id)
            .collect();
        assert_eq!(ids, vec![5, 3]);
    }

    #[test]
    fn hidden_and_unknown_blocks_are_dropped() {
        let mut mobile_hidden = block(1, "text", "desktop only", "{}", 0);
        mobile_hidden.visibility = r#"{"devices":{"mobile":false}}"#.to_string();
        let blocks = vec![mobile_hidden, block(2, "carousel", "", "{}", 1), block(3, "text", "x", "{}", 2)];

        let mobile = render_page(&blocks, &ctx(375), &media());
        assert_eq!(mobile.iter().map(RenderedBlock::block_id).collect::<Vec<_>>(), vec![3]);

        let desktop = render_page(&blocks, &ctx(1440), &media());
        assert_eq!(desktop.iter().map(RenderedBlock::block_id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn failing_block_is_isolated() {
        let blocks = vec![
            block(1, "text", "before", "{}", 0),
            block(2, "image", "", "{}", 1),
            block(3, "video", "", "{}", 2),
            block(4, "text", "after", "{}", 3),
        ];
        let rendered = render_page(&blocks, &ctx(1280), &media());
        assert_eq!(rendered.len(), 4);
        assert!(matches!(rendered[0], RenderedBlock::Ok(_)));
        match &rendered[1] {
            RenderedBlock::Failed(failed) => {
                assert_eq!(failed.block_id, 2);
                assert_eq!(failed.actions, vec![BlockAction::Retry, BlockAction::Remove]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(rendered[2], RenderedBlock::Failed(_)));
        assert!(matches!(rendered[3], RenderedBlock::Ok(_)));
    }

    #[test]
    fn serialized_shape() {
        let node = render(&block(7, "spacer", "", r#"{"height":"xlarge"}"#, 2), &media())
            .unwrap()
            .unwrap();
        let json = serde_json::to_value(RenderedBlock::Ok(node)).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["blockId"], 7);
        assert_eq!(json["node"]["type"], "spacer");
        assert_eq!(json["node"]["height"], "xlarge");
    }
}
