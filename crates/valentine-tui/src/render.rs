use crate::animations::particles::heart_char;
use crate::app::{App, ButtonId, Rect, TRANSITION_FRAMES};
use crate::theme::{
    blend, lerp, rgb, Theme, ENVELOPE, ENVELOPE_FLAP, INK, INK_ACCENT, PAPER, WAX_SEAL,
};
use crossterm::{
    cursor::{Hide, MoveTo},
    queue,
    style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use std::io::{self, Write};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use valentine_core::{labels, Content, Stage};

type Rgb = (u8, u8, u8);

pub fn render(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;
    queue!(stdout, Hide)?;
    render_frame(stdout, app, term_width, term_height)
}

/// Draw one full frame and record the button rectangles on `app`.
pub fn render_frame<W: Write>(
    out: &mut W,
    app: &mut App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    app.resize(term_width, term_height);
    app.buttons.clear();

    let theme = Theme::for_stage(app.stage());
    let content = app.session.content().clone();
    let mut p = Painter {
        out,
        width: term_width,
        height: term_height,
        theme,
    };

    render_background(&mut p, app)?;

    match app.stage() {
        Stage::Identity => render_identity(&mut p, app, &content)?,
        Stage::Denied => render_denied(&mut p, app, &content)?,
        Stage::Welcome => render_welcome(&mut p, app, &content)?,
        Stage::Reasons => render_reasons(&mut p, app, &content)?,
        Stage::Journey => render_journey(&mut p, app, &content)?,
        Stage::Letter => {
            if app.session.is_letter_open() {
                render_letter_open(&mut p, app, &content)?
            } else {
                render_envelope(&mut p, app, &content)?
            }
        }
        Stage::Question => render_question(&mut p, app, &content)?,
        Stage::Success => render_success(&mut p, app, &content)?,
    }

    render_confetti(&mut p, app)?;

    // Footer
    let footer = spaced(&content.footer().to_uppercase());
    let y = term_height.saturating_sub(1);
    let bg = p.theme.bg_at(y, term_height);
    let fg = blend(p.theme.muted, bg, 0.4);
    p.centered(term_width / 2, y, &footer, fg, bg, &[])?;

    queue!(p.out, SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Bounds-checked drawing on one frame
struct Painter<'a, W: Write> {
    out: &'a mut W,
    width: u16,
    height: u16,
    theme: Theme,
}

impl<W: Write> Painter<'_, W> {
    fn text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: Rgb,
        bg: Rgb,
        attrs: &[Attribute],
    ) -> io::Result<()> {
        if y >= self.height || x >= self.width {
            return Ok(());
        }
        let visible = truncate(text, (self.width - x) as usize);
        queue!(
            self.out,
            MoveTo(x, y),
            SetForegroundColor(rgb(fg)),
            SetBackgroundColor(rgb(bg))
        )?;
        for &attr in attrs {
            queue!(self.out, SetAttribute(attr))?;
        }
        queue!(self.out, Print(visible))?;
        if !attrs.is_empty() {
            queue!(self.out, SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }

    fn centered(
        &mut self,
        cx: u16,
        y: u16,
        text: &str,
        fg: Rgb,
        bg: Rgb,
        attrs: &[Attribute],
    ) -> io::Result<()> {
        let half = (text.width() / 2) as u16;
        self.text(cx.saturating_sub(half), y, text, fg, bg, attrs)
    }

    fn fill(&mut self, rect: Rect, bg: Rgb) -> io::Result<()> {
        let blank = " ".repeat(rect.width as usize);
        for y in rect.y..rect.y + rect.height {
            self.text(rect.x, y, &blank, bg, bg, &[])?;
        }
        Ok(())
    }

    /// Rounded box filled with `fill`.
    fn card(&mut self, rect: Rect, fill: Rgb, edge: Rgb) -> io::Result<()> {
        if rect.width < 2 || rect.height < 2 {
            return self.fill(rect, fill);
        }
        let inner = rect.width as usize - 2;
        let top = format!("╭{}╮", "─".repeat(inner));
        let middle = format!("│{}│", " ".repeat(inner));
        let bottom = format!("╰{}╯", "─".repeat(inner));

        self.text(rect.x, rect.y, &top, edge, fill, &[])?;
        for y in rect.y + 1..rect.y + rect.height - 1 {
            self.text(rect.x, y, &middle, edge, fill, &[])?;
        }
        self.text(rect.x, rect.y + rect.height - 1, &bottom, edge, fill, &[])
    }
}

#[derive(Clone, Copy, PartialEq)]
enum ButtonStyle {
    Filled,
    Outline,
}

/// Draw a one-row button centered on `cx` and register its rectangle.
fn render_button<W: Write>(
    p: &mut Painter<W>,
    app: &mut App,
    id: ButtonId,
    label: &str,
    cx: i32,
    y: i32,
    style: ButtonStyle,
    base: Rgb,
) -> io::Result<()> {
    let focused = app.buttons_for_stage().len() > 1 && app.focused_button() == Some(id);
    let text = if focused {
        format!(" › {} ‹ ", label)
    } else {
        format!("   {}   ", label)
    };
    let width = text.width() as u16;
    let max_x = p.width.saturating_sub(width) as i32;
    let max_y = p.height.saturating_sub(2) as i32;
    let x = (cx - width as i32 / 2).clamp(0, max_x) as u16;
    let y = y.clamp(0, max_y) as u16;

    let (fg, bg) = match style {
        ButtonStyle::Filled => (p.theme.button_fg, p.theme.button_bg),
        ButtonStyle::Outline => (p.theme.outline, blend(base, p.theme.outline, 0.12)),
    };
    let fade = app.fade_in();
    let attrs: &[Attribute] = if focused { &[Attribute::Bold] } else { &[] };
    p.text(
        x,
        y,
        &text,
        lerp(base, fg, fade),
        lerp(base, bg, fade),
        attrs,
    )?;

    app.buttons.push((
        id,
        Rect {
            x,
            y,
            width,
            height: 1,
        },
    ));
    Ok(())
}

fn render_background<W: Write>(p: &mut Painter<W>, app: &App) -> io::Result<()> {
    let (width, height) = (p.width, p.height);
    let blank = " ".repeat(width as usize);
    for y in 0..height {
        let bg = p.theme.bg_at(y, height);
        p.text(0, y, &blank, bg, bg, &[])?;
    }

    // Hearts rise from below the bottom edge to above the top
    for (heart, frame) in app.hearts.sample(app.seconds()) {
        let sway = frame.rotation / 45.0;
        let x = (frame.left / 100.0 * width as f32 + sway).round() as i32;
        let y = ((1.0 - frame.progress) * (height as f32 + 1.0)).round() as i32 - 1;
        if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
            continue;
        }
        let bg = p.theme.bg_at(y as u16, height);
        let fg = lerp(bg, heart.color, frame.opacity * 2.0);
        p.text(
            x as u16,
            y as u16,
            &heart_char(heart.size).to_string(),
            fg,
            bg,
            &[],
        )?;
    }
    Ok(())
}

fn render_confetti<W: Write>(p: &mut Painter<W>, app: &App) -> io::Result<()> {
    for particle in app.confetti.particles() {
        if particle.is_visible(p.width, p.height) {
            let (x, y) = (particle.x as u16, particle.y as u16);
            let bg = p.theme.bg_at(y, p.height);
            queue!(
                p.out,
                MoveTo(x, y),
                SetForegroundColor(particle.color),
                SetBackgroundColor(rgb(bg)),
                Print(particle.char)
            )?;
        }
    }
    Ok(())
}

fn render_identity<W: Write>(
    p: &mut Painter<W>,
    app: &mut App,
    content: &Content,
) -> io::Result<()> {
    let card_w = card_width(p.width, 44);
    let inner = card_w.saturating_sub(6) as usize;
    let title = wrap(&content.identity_title(), inner);
    let subtitle = wrap(&content.identity_subtitle, inner);
    let card_h = 10 + title.len() as u16 + subtitle.len() as u16;
    let card = centered_rect(p.width, p.height, card_w, card_h);
    let t = p.theme;
    let fade = app.fade_in();
    let cx = card.x + card.width / 2;

    p.card(card, t.card, blend(t.card, t.outline, 0.3))?;
    let mut row = card.y + 2;
    p.centered(cx, row, "🔒", t.title, t.card, &[])?;
    row += 2;
    for line in &title {
        p.centered(
            cx,
            row,
            line,
            lerp(t.card, t.title, fade),
            t.card,
            &[Attribute::Bold],
        )?;
        row += 1;
    }
    row += 1;
    for line in &subtitle {
        p.centered(cx, row, line, lerp(t.card, t.muted, fade), t.card, &[])?;
        row += 1;
    }
    row += 1;
    render_button(
        p,
        app,
        ButtonId::IdentityYes,
        labels::IDENTITY_YES,
        cx as i32,
        row as i32,
        ButtonStyle::Filled,
        t.card,
    )?;
    row += 2;
    render_button(
        p,
        app,
        ButtonId::IdentityNo,
        labels::IDENTITY_NO,
        cx as i32,
        row as i32,
        ButtonStyle::Outline,
        t.card,
    )
}

fn render_denied<W: Write>(p: &mut Painter<W>, app: &App, content: &Content) -> io::Result<()> {
    let card_w = card_width(p.width, 44);
    let inner = card_w.saturating_sub(6) as usize;
    let title = wrap(&content.denied_title, inner);
    let message = wrap(&content.denied_message(), inner);
    let card_h = 5 + title.len() as u16 + message.len() as u16;
    let card = centered_rect(p.width, p.height, card_w, card_h);
    let t = p.theme;
    let fade = app.fade_in();
    let cx = card.x + card.width / 2;

    p.card(card, t.card, blend(t.card, t.muted, 0.3))?;
    let mut row = card.y + 2;
    for line in &title {
        p.centered(
            cx,
            row,
            line,
            lerp(t.card, t.title, fade),
            t.card,
            &[Attribute::Bold],
        )?;
        row += 1;
    }
    row += 1;
    for line in &message {
        p.centered(cx, row, line, lerp(t.card, t.text, fade), t.card, &[])?;
        row += 1;
    }
    Ok(())
}

fn render_welcome<W: Write>(
    p: &mut Painter<W>,
    app: &mut App,
    content: &Content,
) -> io::Result<()> {
    let card_w = card_width(p.width, 52);
    let inner = card_w.saturating_sub(8) as usize;
    let greeting = wrap(&content.greeting(), inner);
    let lines: Vec<String> = content
        .welcome_lines
        .iter()
        .flat_map(|l| wrap(l, inner))
        .collect();
    let quote = wrap(&content.welcome_quote, inner);
    let card_h = 12 + greeting.len() as u16 + lines.len() as u16 + quote.len() as u16;
    let card = centered_rect(p.width, p.height, card_w, card_h);
    let t = p.theme;
    let fade = app.fade_in();
    let cx = card.x + card.width / 2;

    p.card(card, t.card, blend(t.card, t.title, 0.2))?;
    let mut row = card.y + 2;
    // The house bobs between two rows
    let bob = ((app.seconds() * 2.0).sin() > 0.0) as u16;
    p.centered(cx, row + bob, "🏠", t.title, t.card, &[])?;
    row += 3;
    for line in &greeting {
        p.centered(
            cx,
            row,
            line,
            lerp(t.card, t.title, fade),
            t.card,
            &[Attribute::Bold],
        )?;
        row += 1;
    }
    row += 1;
    for line in &lines {
        p.centered(cx, row, line, lerp(t.card, t.text, fade), t.card, &[])?;
        row += 1;
    }
    row += 1;
    for line in &quote {
        p.centered(
            cx,
            row,
            line,
            lerp(t.card, t.muted, fade),
            t.card,
            &[Attribute::Italic],
        )?;
        row += 1;
    }
    row += 1;
    render_button(
        p,
        app,
        ButtonId::Continue,
        labels::COME_IN,
        cx as i32,
        row as i32,
        ButtonStyle::Filled,
        t.card,
    )
}

fn render_reasons<W: Write>(
    p: &mut Painter<W>,
    app: &mut App,
    content: &Content,
) -> io::Result<()> {
    let t = p.theme;
    let fade = app.fade_in();
    let index = app.session.reason_index();
    let count = content.reason_count();
    let reason = app.session.current_reason().unwrap_or_default().to_string();
    let hint = if app.session.is_last_reason() {
        labels::TAP_TO_CONTINUE
    } else {
        labels::TAP_TO_REVEAL
    };

    let card_w = card_width(p.width, 46);
    let inner = card_w.saturating_sub(8) as usize;
    let text = wrap(&reason, inner);
    let card_h = (text.len() as u16 + 6).max(9);
    let card = centered_rect(p.width, p.height, card_w, card_h);
    let cx = card.x + card.width / 2;

    let title_y = card.y.saturating_sub(3);
    let title_bg = t.bg_at(title_y, p.height);
    p.centered(
        p.width / 2,
        title_y,
        &content.reasons_title,
        lerp(title_bg, t.title, fade),
        title_bg,
        &[Attribute::Bold],
    )?;

    // Cards still to come peek out underneath
    let remaining = count.saturating_sub(index + 1).min(2) as u16;
    for depth in (1..=remaining).rev() {
        let shadow = Rect {
            x: card.x + depth * 2,
            y: card.y + depth,
            ..card
        };
        let fill = blend(t.card, t.title, 0.08 * depth as f32);
        p.card(shadow, fill, blend(fill, t.title, 0.2))?;
    }

    p.card(card, t.card, blend(t.card, t.title, 0.25))?;
    let counter = format!("{} / {}", index + 1, count);
    let counter_x = (card.x + card.width).saturating_sub(counter.width() as u16 + 3);
    p.text(
        counter_x,
        card.y + 1,
        &counter,
        lerp(t.card, t.muted, fade),
        t.card,
        &[],
    )?;

    let mut row = card.y + (card.height.saturating_sub(text.len() as u16 + 2)) / 2;
    for line in &text {
        p.centered(
            cx,
            row,
            line,
            lerp(t.card, t.text, fade),
            t.card,
            &[Attribute::Bold],
        )?;
        row += 1;
    }
    let hint_y = (card.y + card.height).saturating_sub(2);
    p.centered(
        cx,
        hint_y,
        hint,
        lerp(t.card, t.title, fade * 0.8),
        t.card,
        &[],
    )?;
    app.buttons.push((ButtonId::ReasonCard, card));

    // The closing line settles in after a moment on the stage
    let footer_y = card.y + card.height + remaining + 2;
    let footer_bg = t.bg_at(footer_y, p.height);
    let appear = (app.seconds_in_stage() - 1.0).clamp(0.0, 1.0);
    for (i, line) in wrap(&content.reasons_footer, card_w as usize).iter().enumerate() {
        p.centered(
            p.width / 2,
            footer_y + i as u16,
            line,
            lerp(footer_bg, t.muted, appear),
            footer_bg,
            &[Attribute::Italic],
        )?;
    }
    Ok(())
}

/// One row of the laid-out journey
#[derive(Debug, Clone, PartialEq)]
enum JourneyLine {
    Heading(usize, String),
    Body(usize, String),
    Connector,
    Closing(String),
    Button,
    Blank,
}

fn layout_journey(content: &Content, width: usize) -> Vec<JourneyLine> {
    let mut lines = Vec::new();
    let last = content.journey.len().saturating_sub(1);
    for (i, entry) in content.journey.iter().enumerate() {
        lines.push(JourneyLine::Heading(
            i,
            format!("{} {}", entry.icon.glyph(), entry.title),
        ));
        lines.extend(
            wrap(&entry.text, width)
                .into_iter()
                .map(|l| JourneyLine::Body(i, l)),
        );
        if i != last {
            lines.push(JourneyLine::Blank);
            lines.push(JourneyLine::Connector);
            lines.push(JourneyLine::Blank);
        }
    }
    lines.push(JourneyLine::Blank);
    lines.push(JourneyLine::Blank);
    lines.extend(
        wrap(&content.journey_closing, width)
            .into_iter()
            .map(JourneyLine::Closing),
    );
    lines.push(JourneyLine::Blank);
    lines.push(JourneyLine::Button);
    lines
}

fn render_journey<W: Write>(
    p: &mut Painter<W>,
    app: &mut App,
    content: &Content,
) -> io::Result<()> {
    let t = p.theme;
    let fade = app.fade_in();
    let cx = p.width / 2;

    let title_bg = t.bg_at(1, p.height);
    p.centered(
        cx,
        1,
        &content.journey_title,
        lerp(title_bg, t.title, fade),
        title_bg,
        &[Attribute::Bold],
    )?;

    let top = 3u16;
    let bottom = p.height.saturating_sub(2);
    let view_h = bottom.saturating_sub(top) as usize;
    let text_w = card_width(p.width, 60).saturating_sub(4) as usize;
    let lines = layout_journey(content, text_w);

    app.journey_max_scroll = lines.len().saturating_sub(view_h) as u16;
    app.journey_scroll = app.journey_scroll.min(app.journey_max_scroll);
    let scroll = app.journey_scroll as usize;

    for (offset, line) in lines.iter().skip(scroll).take(view_h).enumerate() {
        let y = top + offset as u16;
        let bg = t.bg_at(y, p.height);
        match line {
            JourneyLine::Heading(i, text) | JourneyLine::Body(i, text) => {
                app.reveal_journey_entry(*i);
                let revealed = app.journey_reveals[*i].unwrap_or(app.frame);
                let reveal = ((app.frame - revealed) as f32 / TRANSITION_FRAMES as f32).min(1.0);
                // Entries slide in from alternating sides
                let side = if i % 2 == 0 { -1.0 } else { 1.0 };
                let shift = ((1.0 - reveal) * 6.0 * side) as i32;
                let x = (cx as i32 + shift).max(0) as u16;
                let alpha = reveal * fade;
                if matches!(line, JourneyLine::Heading(..)) {
                    p.centered(x, y, text, lerp(bg, t.title, alpha), bg, &[Attribute::Bold])?;
                } else {
                    p.centered(x, y, text, lerp(bg, t.text, alpha), bg, &[])?;
                }
            }
            JourneyLine::Connector => {
                p.centered(cx, y, "│", lerp(bg, blend(t.title, bg, 0.5), fade), bg, &[])?;
            }
            JourneyLine::Closing(text) => {
                p.centered(
                    cx,
                    y,
                    text,
                    lerp(bg, t.button_bg, fade),
                    bg,
                    &[Attribute::Italic],
                )?;
            }
            JourneyLine::Button => {
                render_button(
                    p,
                    app,
                    ButtonId::Continue,
                    labels::NEXT_CHAPTER,
                    cx as i32,
                    y as i32,
                    ButtonStyle::Filled,
                    bg,
                )?;
            }
            JourneyLine::Blank => {}
        }
    }

    if !app.journey_at_end() {
        let y = bottom;
        let bg = t.bg_at(y, p.height);
        p.centered(cx, y, "↓ scroll ↓", lerp(bg, t.muted, 0.6), bg, &[])?;
    }
    Ok(())
}

fn render_envelope<W: Write>(
    p: &mut Painter<W>,
    app: &mut App,
    content: &Content,
) -> io::Result<()> {
    let fade = app.fade_in();
    let env = centered_rect(p.width, p.height, card_width(p.width, 36), 11);
    let cx = env.x + env.width / 2;

    p.fill(env, ENVELOPE)?;

    // Flap: a triangle pointing down to the seal
    let flap_rows = env.height / 2;
    let step = env.width as f32 / 2.0 / flap_rows.max(1) as f32;
    for r in 0..flap_rows {
        let inset = (r as f32 * step).round() as u16;
        let w = env.width.saturating_sub(inset * 2);
        if w == 0 {
            break;
        }
        p.fill(
            Rect {
                x: env.x + inset,
                y: env.y + r,
                width: w,
                height: 1,
            },
            ENVELOPE_FLAP,
        )?;
    }

    let seal_y = env.y + flap_rows;
    p.centered(
        cx,
        seal_y,
        " ♥ ",
        lerp(ENVELOPE, PAPER, fade),
        WAX_SEAL,
        &[Attribute::Bold],
    )?;
    p.centered(
        cx,
        (env.y + env.height).saturating_sub(2),
        &content.letter.envelope_label,
        lerp(ENVELOPE, INK, fade),
        ENVELOPE,
        &[Attribute::Italic],
    )?;
    app.buttons.push((ButtonId::Envelope, env));

    let hint_y = env.y + env.height + 1;
    let bg = p.theme.bg_at(hint_y, p.height);
    let hint_fg = lerp(bg, p.theme.muted, fade);
    p.centered(p.width / 2, hint_y, "press Enter to open", hint_fg, bg, &[])?;
    Ok(())
}

fn render_letter_open<W: Write>(
    p: &mut Painter<W>,
    app: &mut App,
    content: &Content,
) -> io::Result<()> {
    let letter = &content.letter;
    let fade = app.fade_in();
    let paper_w = card_width(p.width, 62);
    let inner = paper_w.saturating_sub(8) as usize;

    let paragraphs: Vec<Vec<String>> = letter
        .paragraphs
        .iter()
        .map(|para| wrap(para, inner))
        .collect();
    let closing = wrap(&letter.closing, inner);
    let body_rows: usize = paragraphs.iter().map(|para| para.len() + 1).sum();
    let paper_h = (8 + body_rows + closing.len()) as u16;
    let paper = centered_rect(p.width, p.height, paper_w, paper_h);
    let left = paper.x + 4;
    let ink = lerp(PAPER, INK, fade);
    let accent = lerp(PAPER, INK_ACCENT, fade);

    p.card(paper, PAPER, blend(PAPER, INK, 0.3))?;
    p.text(
        (paper.x + paper.width).saturating_sub(4),
        paper.y + 1,
        "✒",
        accent,
        PAPER,
        &[],
    )?;

    let mut row = paper.y + 1;
    p.text(
        left,
        row,
        &letter.salutation,
        accent,
        PAPER,
        &[Attribute::Bold],
    )?;
    row += 2;
    for para in &paragraphs {
        for line in para {
            p.text(left, row, line, ink, PAPER, &[])?;
            row += 1;
        }
        row += 1;
    }
    for line in &closing {
        p.text(left, row, line, accent, PAPER, &[Attribute::Italic])?;
        row += 1;
    }
    let sig_x = (paper.x + paper.width).saturating_sub(letter.signature.width() as u16 + 4);
    p.text(
        sig_x,
        row,
        &letter.signature,
        accent,
        PAPER,
        &[Attribute::Italic],
    )?;
    row += 2;

    render_button(
        p,
        app,
        ButtonId::Continue,
        &letter.continue_label,
        (paper.x + paper.width / 2) as i32,
        row as i32,
        ButtonStyle::Filled,
        PAPER,
    )
}

fn render_question<W: Write>(
    p: &mut Painter<W>,
    app: &mut App,
    content: &Content,
) -> io::Result<()> {
    let card_w = card_width(p.width, 48);
    let inner = card_w.saturating_sub(6) as usize;
    let question = wrap(&content.question, inner);
    let card_h = 12 + question.len() as u16;
    let card = centered_rect(p.width, p.height, card_w, card_h);
    let t = p.theme;
    let fade = app.fade_in();
    let cx = card.x + card.width / 2;

    p.card(card, t.card, blend(t.card, t.title, 0.25))?;
    let mut row = card.y + 2;
    p.centered(
        cx,
        row,
        &content.question_title(),
        lerp(t.card, t.title, fade),
        t.card,
        &[Attribute::Bold],
    )?;
    row += 2;
    for line in &question {
        p.centered(cx, row, line, lerp(t.card, t.text, fade), t.card, &[])?;
        row += 1;
    }
    let yes_row = row + 2;
    let no_row = yes_row + 3;

    // "Yes" is drawn after "no", so it stays on top and keeps its clicks
    let (dx, dy) = app.dodge_cells();
    let (x, y) = (cx as i32 + dx as i32, no_row as i32 + dy as i32);
    let base = if card.contains(x.max(0) as u16, y.max(0) as u16) {
        t.card
    } else {
        t.bg_at(y.max(0) as u16, p.height)
    };
    render_button(
        p,
        app,
        ButtonId::ProposalNo,
        labels::PROPOSAL_NO,
        x,
        y,
        ButtonStyle::Outline,
        base,
    )?;
    render_button(
        p,
        app,
        ButtonId::ProposalYes,
        labels::PROPOSAL_YES,
        cx as i32,
        yes_row as i32,
        ButtonStyle::Filled,
        t.card,
    )
}

fn render_success<W: Write>(p: &mut Painter<W>, app: &App, content: &Content) -> io::Result<()> {
    let card_w = card_width(p.width, 44);
    let card = centered_rect(p.width, p.height, card_w, 12);
    let t = p.theme;
    let fade = app.fade_in();
    let cx = card.x + card.width / 2;
    let secs = app.seconds();

    p.card(card, t.card, blend(t.card, t.title, 0.25))?;
    let bounce = ((secs * 4.0).sin() > 0.0) as u16;
    p.centered(cx, card.y + 2 + bounce, "🎉", t.title, t.card, &[])?;
    p.centered(
        cx,
        card.y + 5,
        &content.success_title,
        lerp(t.card, t.title, fade),
        t.card,
        &[Attribute::Bold],
    )?;

    // Two hearts beating out of phase
    let beat = (secs * 2.0) as u64 % 2 == 0;
    let (left, right) = if beat {
        ((244, 63, 94), (139, 92, 246))
    } else {
        ((139, 92, 246), (244, 63, 94))
    };
    p.text(
        cx.saturating_sub(3),
        card.y + 7,
        "♥",
        lerp(t.card, left, fade),
        t.card,
        &[],
    )?;
    p.text(
        cx + 2,
        card.y + 7,
        "♥",
        lerp(t.card, right, fade),
        t.card,
        &[],
    )?;

    let hint = spaced(&format!("{} 📷", content.success_hint.to_uppercase()));
    p.centered(
        cx,
        card.y + 9,
        &hint,
        lerp(t.card, t.muted, fade),
        t.card,
        &[],
    )?;
    Ok(())
}

fn card_width(term_width: u16, preferred: u16) -> u16 {
    preferred.min(term_width.saturating_sub(4)).max(term_width.min(12))
}

/// A `width` x `height` rectangle centered above the footer row.
fn centered_rect(term_width: u16, term_height: u16, width: u16, height: u16) -> Rect {
    let usable = term_height.saturating_sub(1);
    let width = width.min(term_width);
    let height = height.min(usable.max(1));
    Rect {
        x: (term_width - width) / 2,
        y: usable.saturating_sub(height) / 2,
        width,
        height,
    }
}

/// Word-wrap by display width; words longer than a line keep a line of their own.
pub fn wrap(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.width() + word.width() + 1 > max_width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Longest prefix of `text` that fits in `max_width` cells.
fn truncate(text: &str, max_width: usize) -> &str {
    let mut used = 0;
    for (i, c) in text.char_indices() {
        used += c.width().unwrap_or(0);
        if used > max_width {
            return &text[..i];
        }
    }
    text
}

/// "FOR INI" -> "F O R   I N I"
fn spaced(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for (i, c) in text.chars().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}
