//! Server-side HTML for rendered blocks. Every piece of stored text goes
//! through `html_escape` before it is written out.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use super::render::{BlockNode, FailedBlock, RenderNode, RenderedBlock, VideoSource};
use super::settings::ButtonVariant;
use crate::animation::AnimationWrapper;

const VIDEO_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";

fn button_class(variant: ButtonVariant) -> &'static str {
    match variant {
        ButtonVariant::Default => "btn btn-lg min-w-[200px]",
        ButtonVariant::Outline => "btn btn-outline btn-lg min-w-[200px]",
        ButtonVariant::Ghost => "btn btn-ghost btn-lg min-w-[200px]",
    }
}

impl BlockNode {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        // `write!` into a String cannot fail.
        let _ = self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) -> std::fmt::Result {
        match self {
            BlockNode::Text { text: body, alignment, font_size } => write!(
                out,
                r#"<div class="prose max-w-none my-6 {} {}"><p class="whitespace-pre-wrap leading-relaxed">{}</p></div>"#,
                alignment.text_class(),
                font_size.class(),
                text(body)
            ),
            BlockNode::Image { src, alt, caption, alignment, width } => {
                write!(
                    out,
                    r#"<figure class="{} {} my-8"><img src="{}" alt="{}" class="w-full h-auto rounded-lg shadow-md" />"#,
                    width.class(),
                    alignment.box_class(),
                    attr(src),
                    attr(alt)
                )?;
                if let Some(caption) = caption {
                    write!(
                        out,
                        r#"<figcaption class="text-sm mt-3 text-center italic">{}</figcaption>"#,
                        text(caption)
                    )?;
                }
                out.write_str("</figure>")
            }
            BlockNode::Video { source, alignment, width, playback } => {
                write!(out, r#"<div class="{} {} my-8">"#, width.class(), alignment.box_class())?;
                match source {
                    VideoSource::Embed { url, .. } => write!(
                        out,
                        r#"<div class="relative aspect-video rounded-lg overflow-hidden shadow-lg"><iframe src="{}" class="absolute inset-0 w-full h-full" allow="{VIDEO_ALLOW}" allowfullscreen></iframe></div>"#,
                        attr(url)
                    )?,
                    VideoSource::File { url } => {
                        write!(out, r#"<video src="{}" controls"#, attr(url))?;
                        if playback.autoplay {
                            out.write_str(" autoplay")?;
                        }
                        if playback.looped {
                            out.write_str(" loop")?;
                        }
                        if playback.muted {
                            out.write_str(" muted")?;
                        }
                        out.write_str(r#" class="w-full h-auto rounded-lg shadow-lg"></video>"#)?;
                    }
                }
                out.write_str("</div>")
            }
            BlockNode::Quote { text: body, author, role, alignment, style } => {
                write!(
                    out,
                    r#"<blockquote class="my-8 max-w-3xl mx-auto {}"><p class="text-xl md:text-2xl font-light leading-relaxed {}">&ldquo;{}&rdquo;</p>"#,
                    style.class(),
                    alignment.text_class(),
                    text(body)
                )?;
                if author.is_some() || role.is_some() {
                    write!(out, r#"<footer class="mt-4 {}">"#, alignment.text_class())?;
                    if let Some(author) = author {
                        write!(out, r#"<cite class="text-base font-medium not-italic">{}</cite>"#, text(author))?;
                    }
                    if let Some(role) = role {
                        write!(out, r#"<span class="text-sm block mt-1">{}</span>"#, text(role))?;
                    }
                    out.write_str("</footer>")?;
                }
                out.write_str("</blockquote>")
            }
            BlockNode::Cta {
                headline,
                subtitle,
                button_text,
                button_link,
                alignment,
                style,
                button_variant,
            } => {
                write!(
                    out,
                    r#"<div class="my-12 p-8 md:p-12 rounded-xl {}"><div class="max-w-3xl mx-auto flex flex-col gap-6 {}"><h2 class="text-3xl md:text-4xl font-light tracking-tight">{}</h2>"#,
                    style.class(),
                    alignment.flex_class(),
                    text(headline)
                )?;
                if let Some(subtitle) = subtitle {
                    write!(out, r#"<p class="text-lg font-light max-w-2xl">{}</p>"#, text(subtitle))?;
                }
                write!(
                    out,
                    r#"<div><a href="{}" class="{}">{}</a></div></div></div>"#,
                    attr(button_link),
                    button_class(*button_variant),
                    text(button_text)
                )
            }
            BlockNode::Spacer { height } => {
                write!(out, r#"<div class="{}" aria-hidden="true"></div>"#, height.class())
            }
        }
    }
}

fn wrap(inner: String, animation: &AnimationWrapper) -> String {
    let style = format!("transition: {}; {}", animation.transition, animation.initial.to_css());
    let mut out = format!(
        r#"<div data-animation-trigger="{}" data-animation-delay="{}" data-animation-rest="{}""#,
        animation.trigger.as_str(),
        animation.delay,
        attr(&animation.resting.to_css())
    );
    if let Some(threshold) = animation.threshold {
        let _ = write!(out, r#" data-animation-threshold="{threshold}""#);
    }
    let _ = write!(out, r#" style="{}">{inner}</div>"#, attr(&style));
    out
}

impl RenderNode {
    pub fn to_html(&self) -> String {
        let inner = format!(
            r#"<section data-block-id="{}">{}</section>"#,
            self.block_id,
            self.node.to_html()
        );
        match &self.animation {
            Some(animation) => wrap(inner, animation),
            None => inner,
        }
    }
}

impl FailedBlock {
    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="block-error border border-red-200 rounded-lg p-4" data-block-id="{}" role="alert"><p>This block failed to render.</p><button type="button" data-block-action="retry">Retry</button><button type="button" data-block-action="remove">Remove</button></div>"#,
            self.block_id
        )
    }
}

impl RenderedBlock {
    pub fn to_html(&self) -> String {
        match self {
            RenderedBlock::Ok(node) => node.to_html(),
            RenderedBlock::Failed(failed) => failed.to_html(),
        }
    }
}

/// Concatenated HTML for a rendered page.
pub fn page_html(blocks: &[RenderedBlock]) -> String {
    blocks.iter().map(RenderedBlock::to_html).collect()
}
