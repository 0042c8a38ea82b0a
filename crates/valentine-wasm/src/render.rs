//! Canvas rendering

use crate::theme::{
    Color, Theme, CARD_ALPHA, ENVELOPE, ENVELOPE_FLAP, INK, INK_ACCENT, PAPER, WAX_SEAL, WHITE,
};
use crate::view::{Bounds, ButtonId, ViewState, JOURNEY_TOP};
use valentine_core::{labels, Content, Stage};
use web_sys::CanvasRenderingContext2d;

const TITLE_FONT: &str = "'Dancing Script', 'Brush Script MT', cursive";
const BODY_FONT: &str = "'Quicksand', 'Segoe UI', sans-serif";

#[derive(Clone, Copy, PartialEq)]
enum ButtonStyle {
    Filled,
    Outline,
}

/// Render the current frame
pub fn render(ctx: &CanvasRenderingContext2d, view: &ViewState) {
    let (width, height) = (view.width(), view.height());
    let theme = Theme::for_stage(view.stage());
    let content = view.session().content();

    render_background(ctx, &theme, width, height);
    render_hearts(ctx, view);

    ctx.save();
    ctx.set_global_alpha(view.fade_in());
    if let Some(card) = view.card() {
        // Letters and the reason stack draw their own surfaces
        if !matches!(view.stage(), Stage::Letter | Stage::Reasons) {
            rounded_rect(ctx, &card, 24.0);
            ctx.set_fill_style_str(&theme.card.as_css_alpha(CARD_ALPHA));
            ctx.fill();
            ctx.set_stroke_style_str(&WHITE.as_css_alpha(0.8));
            ctx.set_line_width(1.5);
            ctx.stroke();
        }
    }

    match view.stage() {
        Stage::Identity => render_identity(ctx, view, content, &theme),
        Stage::Denied => render_denied(ctx, view, content, &theme),
        Stage::Welcome => render_welcome(ctx, view, content, &theme),
        Stage::Reasons => render_reasons(ctx, view, content, &theme),
        Stage::Journey => render_journey(ctx, view, content, &theme),
        Stage::Letter => {
            if view.session().is_letter_open() {
                render_letter(ctx, view, content, &theme)
            } else {
                render_envelope(ctx, view, content)
            }
        }
        Stage::Question => render_question(ctx, view, content, &theme),
        Stage::Success => render_success(ctx, view, content, &theme),
    }
    ctx.restore();

    render_confetti(ctx, view);

    // Footer
    ctx.set_font(&format!("12px {}", BODY_FONT));
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_fill_style_str(&theme.muted.as_css_alpha(0.5));
    let _ = ctx.fill_text(&content.footer().to_uppercase(), width / 2.0, height - 20.0);
}

fn render_background(ctx: &CanvasRenderingContext2d, theme: &Theme, width: f64, height: f64) {
    let gradient = ctx.create_linear_gradient(0.0, 0.0, width, height);
    let _ = gradient.add_color_stop(0.0, &theme.bg_top.as_css());
    let _ = gradient.add_color_stop(1.0, &theme.bg_bottom.as_css());
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill_rect(0.0, 0.0, width, height);
}

fn render_hearts(ctx: &CanvasRenderingContext2d, view: &ViewState) {
    let (width, height) = (view.width(), view.height());
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    for (heart, frame) in view.hearts().sample(view.elapsed_secs() as f32) {
        let x = frame.left as f64 / 100.0 * width;
        // From just below the bottom edge to just above the top
        let y = height + 40.0 - frame.progress as f64 * (height + 80.0);
        ctx.save();
        let _ = ctx.translate(x, y);
        let _ = ctx.rotate((frame.rotation as f64).to_radians());
        ctx.set_font(&format!("{}px sans-serif", heart.size));
        let color = Color::from_tuple(heart.color);
        ctx.set_fill_style_str(&color.as_css_alpha(frame.opacity as f64));
        let _ = ctx.fill_text("♥", 0.0, 0.0);
        ctx.restore();
    }
}

fn render_confetti(ctx: &CanvasRenderingContext2d, view: &ViewState) {
    for p in view.confetti().particles() {
        if !p.is_visible(view.width(), view.height()) {
            continue;
        }
        ctx.save();
        let _ = ctx.translate(p.x, p.y);
        let _ = ctx.rotate(p.rotation);
        ctx.set_fill_style_str(&p.color.as_css_alpha(p.alpha()));
        ctx.fill_rect(-p.size / 2.0, -p.size / 4.0, p.size, p.size / 2.0);
        ctx.restore();
    }
}

fn render_identity(
    ctx: &CanvasRenderingContext2d,
    view: &ViewState,
    content: &Content,
    theme: &Theme,
) {
    let (cx, cy) = (view.width() / 2.0, view.height() / 2.0);
    text(ctx, "🔒", cx, cy - 100.0, "40px sans-serif", theme.title);
    text(
        ctx,
        &content.identity_title(),
        cx,
        cy - 40.0,
        &format!("48px {}", TITLE_FONT),
        theme.title,
    );
    text(
        ctx,
        &content.identity_subtitle,
        cx,
        cy + 10.0,
        &format!("500 16px {}", BODY_FONT),
        theme.muted,
    );
    render_buttons(ctx, view, theme, |id| match id {
        ButtonId::IdentityYes => (labels::IDENTITY_YES, ButtonStyle::Filled),
        _ => (labels::IDENTITY_NO, ButtonStyle::Outline),
    });
}

fn render_denied(
    ctx: &CanvasRenderingContext2d,
    view: &ViewState,
    content: &Content,
    theme: &Theme,
) {
    let (cx, cy) = (view.width() / 2.0, view.height() / 2.0);
    text(
        ctx,
        &content.denied_title,
        cx,
        cy - 30.0,
        &format!("bold 32px {}", BODY_FONT),
        theme.title,
    );
    text(
        ctx,
        &content.denied_message(),
        cx,
        cy + 20.0,
        &format!("18px {}", BODY_FONT),
        theme.text,
    );
}

fn render_welcome(
    ctx: &CanvasRenderingContext2d,
    view: &ViewState,
    content: &Content,
    theme: &Theme,
) {
    let (cx, cy) = (view.width() / 2.0, view.height() / 2.0);
    let t = view.elapsed_secs();
    let bob = (t * 2.0).sin() * 6.0;

    ctx.save();
    let _ = ctx.translate(cx, cy - 130.0 + bob);
    let _ = ctx.rotate((t * 1.5).sin() * 0.1);
    text(ctx, "🏠", 0.0, 0.0, "44px sans-serif", theme.title);
    ctx.restore();

    text(
        ctx,
        &content.greeting(),
        cx,
        cy - 70.0,
        &format!("52px {}", TITLE_FONT),
        theme.title,
    );
    let body_font = format!("500 18px {}", BODY_FONT);
    let mut y = cy - 20.0;
    for line in &content.welcome_lines {
        y = paragraph(ctx, line, cx, y, 380.0, 26.0, &body_font, theme.text);
    }
    paragraph(
        ctx,
        &content.welcome_quote,
        cx,
        y + 10.0,
        380.0,
        24.0,
        &format!("italic 16px {}", BODY_FONT),
        theme.muted,
    );
    render_buttons(ctx, view, theme, |_| (labels::COME_IN, ButtonStyle::Filled));
}

fn render_reasons(
    ctx: &CanvasRenderingContext2d,
    view: &ViewState,
    content: &Content,
    theme: &Theme,
) {
    let Some(card) = view.card() else {
        return;
    };
    let (cx, cy) = card.center();
    let session = view.session();
    let index = session.reason_index();

    text(
        ctx,
        &content.reasons_title,
        cx,
        card.y - 60.0,
        &format!("40px {}", TITLE_FONT),
        theme.title,
    );

    // Cards still to come, stacked behind
    let remaining = content.reason_count().saturating_sub(index + 1).min(2);
    for depth in (1..=remaining).rev() {
        let offset = depth as f64 * 8.0;
        let behind = Bounds {
            x: card.x + offset,
            y: card.y + offset,
            ..card
        };
        rounded_rect(ctx, &behind, 24.0);
        let shade = theme.card.lerp(theme.title, 0.08 * depth as f64);
        ctx.set_fill_style_str(&shade.as_css_alpha(0.5));
        ctx.fill();
    }
    rounded_rect(ctx, &card, 24.0);
    ctx.set_fill_style_str(&WHITE.as_css_alpha(0.85));
    ctx.fill();

    let counter = format!("{} / {}", index + 1, content.reason_count());
    text(
        ctx,
        &counter,
        card.x + card.w - 40.0,
        card.y + 24.0,
        &format!("12px {}", BODY_FONT),
        theme.muted,
    );
    if let Some(reason) = session.current_reason() {
        paragraph(
            ctx,
            reason,
            cx,
            cy - 20.0,
            card.w - 60.0,
            30.0,
            &format!("600 22px {}", BODY_FONT),
            theme.text,
        );
    }
    let hint = if session.is_last_reason() {
        labels::TAP_TO_CONTINUE
    } else {
        labels::TAP_TO_REVEAL
    };
    let pulse = 0.6 + 0.4 * (view.elapsed_secs() * 3.0).sin().abs();
    ctx.save();
    ctx.set_global_alpha(view.fade_in() * pulse);
    text(
        ctx,
        hint,
        cx,
        card.y + card.h - 30.0,
        &format!("13px {}", BODY_FONT),
        theme.title,
    );
    ctx.restore();

    // Settles in after a moment on the stage
    let appear = (view.seconds_in_stage() - 1.0).clamp(0.0, 1.0);
    ctx.save();
    ctx.set_global_alpha(view.fade_in() * appear);
    paragraph(
        ctx,
        &content.reasons_footer,
        cx,
        card.y + card.h + 50.0,
        card.w + 80.0,
        24.0,
        &format!("italic 16px {}", BODY_FONT),
        theme.muted,
    );
    ctx.restore();
}

fn render_journey(
    ctx: &CanvasRenderingContext2d,
    view: &ViewState,
    content: &Content,
    theme: &Theme,
) {
    let cx = view.width() / 2.0;
    text(
        ctx,
        &content.journey_title,
        cx,
        60.0,
        &format!("48px {}", TITLE_FONT),
        theme.title,
    );

    ctx.save();
    ctx.begin_path();
    ctx.rect(0.0, JOURNEY_TOP, view.width(), view.height() - JOURNEY_TOP);
    ctx.clip();

    // Timeline spine
    let first = view.journey_entry_y(0);
    let last = view.journey_entry_y(content.journey.len().saturating_sub(1));
    ctx.set_stroke_style_str(&theme.title.as_css_alpha(0.25));
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.move_to(cx, first + 20.0);
    ctx.line_to(cx, last + 20.0);
    ctx.stroke();

    for (i, entry) in content.journey.iter().enumerate() {
        let reveal = view.journey_reveal(i);
        if reveal <= 0.0 {
            continue;
        }
        let side = if i % 2 == 0 { -1.0 } else { 1.0 };
        let x = cx + side * (1.0 - reveal) * 50.0;
        let y = view.journey_entry_y(i);

        ctx.save();
        ctx.set_global_alpha(view.fade_in() * reveal);
        ctx.begin_path();
        let _ = ctx.arc(cx, y + 20.0, 18.0, 0.0, std::f64::consts::TAU);
        ctx.set_fill_style_str(&WHITE.as_css());
        ctx.fill();
        text(
            ctx,
            &entry.icon.glyph().to_string(),
            cx,
            y + 20.0,
            "18px sans-serif",
            theme.title,
        );
        text(
            ctx,
            &entry.title,
            x,
            y + 60.0,
            &format!("bold 20px {}", BODY_FONT),
            theme.title,
        );
        paragraph(
            ctx,
            &entry.text,
            x,
            y + 90.0,
            420.0,
            22.0,
            &format!("15px {}", BODY_FONT),
            theme.text,
        );
        ctx.restore();
    }

    let closing_y = view.journey_entry_y(content.journey.len()) + 40.0;
    paragraph(
        ctx,
        &content.journey_closing,
        cx,
        closing_y,
        420.0,
        28.0,
        &format!("italic 22px {}", BODY_FONT),
        theme.button_bg,
    );
    render_buttons(ctx, view, theme, |_| {
        (labels::NEXT_CHAPTER, ButtonStyle::Filled)
    });
    ctx.restore();

    if !view.journey_at_end() {
        text(
            ctx,
            "⌄",
            cx,
            view.height() - 50.0,
            &format!("24px {}", BODY_FONT),
            theme.muted,
        );
    }
}

fn render_envelope(ctx: &CanvasRenderingContext2d, view: &ViewState, content: &Content) {
    let Some(env) = view.card() else {
        return;
    };
    let (cx, cy) = env.center();

    ctx.set_fill_style_str(&ENVELOPE.as_css());
    ctx.fill_rect(env.x, env.y, env.w, env.h);

    // Flap
    ctx.begin_path();
    ctx.move_to(env.x, env.y);
    ctx.line_to(cx, cy);
    ctx.line_to(env.x + env.w, env.y);
    ctx.close_path();
    ctx.set_fill_style_str(&ENVELOPE_FLAP.as_css());
    ctx.fill();

    // Seal
    ctx.begin_path();
    let _ = ctx.arc(cx, cy, 22.0, 0.0, std::f64::consts::TAU);
    ctx.set_fill_style_str(&WAX_SEAL.as_css());
    ctx.fill();
    text(ctx, "♥", cx, cy + 1.0, "20px sans-serif", PAPER);

    text(
        ctx,
        &content.letter.envelope_label,
        cx,
        env.y + env.h - 30.0,
        &format!("22px {}", TITLE_FONT),
        INK,
    );
}

fn render_letter(
    ctx: &CanvasRenderingContext2d,
    view: &ViewState,
    content: &Content,
    theme: &Theme,
) {
    let Some(paper) = view.card() else {
        return;
    };
    let letter = &content.letter;

    ctx.set_fill_style_str(&PAPER.as_css());
    ctx.fill_rect(paper.x, paper.y, paper.w, paper.h);
    ctx.set_stroke_style_str(&INK.as_css_alpha(0.2));
    ctx.stroke_rect(paper.x + 8.0, paper.y + 8.0, paper.w - 16.0, paper.h - 16.0);

    let left = paper.x + 40.0;
    let width = paper.w - 80.0;
    ctx.set_text_align("left");
    ctx.set_text_baseline("top");
    ctx.set_font(&format!("bold 28px {}", TITLE_FONT));
    ctx.set_fill_style_str(&INK_ACCENT.as_css());
    let _ = ctx.fill_text(&letter.salutation, left, paper.y + 40.0);

    let body_font = format!("17px {}", BODY_FONT);
    let mut y = paper.y + 90.0;
    for para in &letter.paragraphs {
        for line in wrap(ctx, para, width, &body_font) {
            ctx.set_fill_style_str(&INK.as_css());
            let _ = ctx.fill_text(&line, left, y);
            y += 24.0;
        }
        y += 12.0;
    }
    let closing_font = format!("italic 20px {}", TITLE_FONT);
    ctx.set_font(&closing_font);
    ctx.set_fill_style_str(&INK_ACCENT.as_css());
    for line in wrap(ctx, &letter.closing, width, &closing_font) {
        let _ = ctx.fill_text(&line, left, y);
        y += 26.0;
    }
    ctx.set_text_align("right");
    let _ = ctx.fill_text(&letter.signature, paper.x + paper.w - 40.0, y + 6.0);

    render_buttons(ctx, view, theme, |_| {
        (letter.continue_label.as_str(), ButtonStyle::Filled)
    });
}

fn render_question(
    ctx: &CanvasRenderingContext2d,
    view: &ViewState,
    content: &Content,
    theme: &Theme,
) {
    let (cx, cy) = (view.width() / 2.0, view.height() / 2.0);
    text(
        ctx,
        &content.question_title(),
        cx,
        cy - 100.0,
        &format!("64px {}", TITLE_FONT),
        theme.title,
    );
    paragraph(
        ctx,
        &content.question,
        cx,
        cy - 30.0,
        380.0,
        30.0,
        &format!("600 22px {}", BODY_FONT),
        theme.text,
    );
    render_buttons(ctx, view, theme, |id| match id {
        ButtonId::ProposalYes => (labels::PROPOSAL_YES, ButtonStyle::Filled),
        _ => (labels::PROPOSAL_NO, ButtonStyle::Outline),
    });
}

fn render_success(
    ctx: &CanvasRenderingContext2d,
    view: &ViewState,
    content: &Content,
    theme: &Theme,
) {
    let (cx, cy) = (view.width() / 2.0, view.height() / 2.0);
    let t = view.elapsed_secs();

    let bounce = (t * 4.0).sin().abs() * 12.0;
    text(
        ctx,
        "🎉",
        cx,
        cy - 90.0 - bounce,
        "56px sans-serif",
        theme.title,
    );
    text(
        ctx,
        &content.success_title,
        cx,
        cy - 10.0,
        &format!("64px {}", TITLE_FONT),
        theme.title,
    );

    let beat = 1.0 + 0.15 * (t * 5.0).sin();
    for (dx, color) in [(-24.0, theme.title), (24.0, Color::new(139, 92, 246))] {
        ctx.save();
        let _ = ctx.translate(cx + dx, cy + 55.0);
        let _ = ctx.scale(beat, beat);
        text(ctx, "♥", 0.0, 0.0, "32px sans-serif", color);
        ctx.restore();
    }
    text(
        ctx,
        &format!("{} 📷", content.success_hint.to_uppercase()),
        cx,
        cy + 110.0,
        &format!("600 13px {}", BODY_FONT),
        theme.muted,
    );
}

/// Draw every laid-out button; `style_of` picks the label and look.
fn render_buttons<'a>(
    ctx: &CanvasRenderingContext2d,
    view: &ViewState,
    theme: &Theme,
    style_of: impl Fn(ButtonId) -> (&'a str, ButtonStyle),
) {
    let show_focus = view.buttons_for_stage().len() > 1;
    for (id, bounds) in view.layout() {
        let (label, style) = style_of(id);
        let focused = show_focus && view.focused_button() == Some(id);
        rounded_rect(ctx, &bounds, bounds.h / 2.0);
        match style {
            ButtonStyle::Filled => {
                ctx.set_fill_style_str(&theme.button_bg.as_css());
                ctx.fill();
            }
            ButtonStyle::Outline => {
                ctx.set_fill_style_str(&WHITE.as_css_alpha(0.5));
                ctx.fill();
                ctx.set_stroke_style_str(&theme.outline.as_css_alpha(0.5));
                ctx.set_line_width(1.5);
                ctx.stroke();
            }
        }
        if focused {
            let ring = Bounds {
                x: bounds.x - 4.0,
                y: bounds.y - 4.0,
                w: bounds.w + 8.0,
                h: bounds.h + 8.0,
            };
            rounded_rect(ctx, &ring, ring.h / 2.0);
            ctx.set_stroke_style_str(&theme.title.as_css_alpha(0.6));
            ctx.set_line_width(2.0);
            ctx.stroke();
        }
        let fg = match style {
            ButtonStyle::Filled => theme.button_fg,
            ButtonStyle::Outline => theme.outline,
        };
        let (bx, by) = bounds.center();
        text(ctx, label, bx, by, &format!("bold 17px {}", BODY_FONT), fg);
    }
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, b: &Bounds, radius: f64) {
    let r = radius.min(b.w / 2.0).min(b.h / 2.0);
    ctx.begin_path();
    ctx.move_to(b.x + r, b.y);
    let _ = ctx.arc_to(b.x + b.w, b.y, b.x + b.w, b.y + b.h, r);
    let _ = ctx.arc_to(b.x + b.w, b.y + b.h, b.x, b.y + b.h, r);
    let _ = ctx.arc_to(b.x, b.y + b.h, b.x, b.y, r);
    let _ = ctx.arc_to(b.x, b.y, b.x + b.w, b.y, r);
    ctx.close_path();
}

/// One centered line of text
fn text(ctx: &CanvasRenderingContext2d, s: &str, x: f64, y: f64, font: &str, color: Color) {
    ctx.set_font(font);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_fill_style_str(&color.as_css());
    let _ = ctx.fill_text(s, x, y);
}

/// Wrapped, centered text starting at `y`. Returns the y below the last line.
#[allow(clippy::too_many_arguments)]
fn paragraph(
    ctx: &CanvasRenderingContext2d,
    s: &str,
    x: f64,
    y: f64,
    max_width: f64,
    line_height: f64,
    font: &str,
    color: Color,
) -> f64 {
    let mut y = y;
    for line in wrap(ctx, s, max_width, font) {
        text(ctx, &line, x, y, font, color);
        y += line_height;
    }
    y
}

fn wrap(ctx: &CanvasRenderingContext2d, s: &str, max_width: f64, font: &str) -> Vec<String> {
    ctx.set_font(font);
    let fits = |line: &str| {
        ctx.measure_text(line)
            .map(|m| m.width() <= max_width)
            .unwrap_or(true)
    };

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in s.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if !current.is_empty() && !fits(&candidate) {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
