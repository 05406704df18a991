use {
    std::f64::consts::TAU,
    image::{Rgba, RgbaImage},
    crate::{
        aggregate::SentimentTally,
        sentiment::SentimentLabel,
        render::glyphs::{draw_text, text_width, GLYPH_SIZE},
    },
};

const TITLE: &str = "Sentiment Distribution";
const TEXT_COLOR: Rgba<u8> = Rgba([0x26, 0x26, 0x26, 0xff]);
const OUTLINE_COLOR: Rgba<u8> = Rgba([0xa3, 0xa3, 0xa3, 0xff]);

pub fn label_color(label: SentimentLabel) -> Rgba<u8> {
    match label {
        SentimentLabel::Positive => Rgba([0x22, 0xc5, 0x5e, 0xff]),
        SentimentLabel::Negative => Rgba([0xef, 0x44, 0x44, 0xff]),
        SentimentLabel::Neutral => Rgba([0xa3, 0xa3, 0xa3, 0xff]),
    }
}

pub fn legend_line(tally: &SentimentTally, label: SentimentLabel) -> String {
    format!("{} {:.1}%", label, tally.percentage(label))
}

/// Square chart on a transparent background: title on top, wedges starting at
/// three o'clock and running counter-clockwise in label order, legend below.
pub fn pie_chart_image(tally: &SentimentTally, size: u32) -> RgbaImage {
    let mut image = RgbaImage::new(size, size);
    let text_scale = (size / 200).max(1);
    let line_height = GLYPH_SIZE * text_scale + 4;
    let margin = (size / 40).max(2);

    let title_scale = fitting_scale(TITLE, text_scale, size);
    let title_x = (size.saturating_sub(text_width(TITLE, title_scale)) / 2) as i64;
    draw_text(&mut image, TITLE, title_x, margin as i64, title_scale, TEXT_COLOR);

    let title_bottom = margin + GLYPH_SIZE * title_scale + margin;
    let legend_height = line_height * SentimentLabel::ALL.len() as u32 + margin;
    let available = size.saturating_sub(title_bottom + legend_height);
    let radius = (available.min(size) / 2).saturating_sub(margin).max(1) as f64;
    let center_x = size as f64 / 2.0;
    let center_y = title_bottom as f64 + margin as f64 + radius;

    draw_disc(&mut image, tally, center_x, center_y, radius);

    let legend_top = (center_y + radius) as u32 + margin;
    for (index, label) in SentimentLabel::ALL.into_iter().enumerate() {
        let y = (legend_top + index as u32 * line_height) as i64;
        let swatch = GLYPH_SIZE * text_scale;
        let x = margin as i64 * 2;

        fill_rect(&mut image, x, y, swatch, swatch, label_color(label));
        draw_text(&mut image, &legend_line(tally, label), x + swatch as i64 + margin as i64, y, text_scale, TEXT_COLOR);
    }

    image
}

fn draw_disc(image: &mut RgbaImage, tally: &SentimentTally, center_x: f64, center_y: f64, radius: f64) {
    let total = tally.total();
    let bounds: Vec<(f64, SentimentLabel)> = SentimentLabel::ALL.iter()
        .scan(0usize, |cumulative, label| {
            *cumulative += tally.get(*label);
            Some((*cumulative as f64 / total.max(1) as f64, *label))
        })
        .collect();

    for y in 0..image.height() {
        for x in 0..image.width() {
            let dx = x as f64 + 0.5 - center_x;
            let dy = y as f64 + 0.5 - center_y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance > radius {
                continue;
            }

            if total == 0 {
                // empty tally: outlined disc only
                if distance >= radius - 1.5 {
                    image.put_pixel(x, y, OUTLINE_COLOR);
                }
                continue;
            }

            // image y grows downwards, flip it to get counter-clockwise angles
            let fraction = (-dy).atan2(dx).rem_euclid(TAU) / TAU;
            let label = bounds.iter()
                .find(|(bound, _)| fraction < *bound)
                .map(|(_, label)| *label)
                .unwrap_or_else(|| last_nonempty(tally));
            image.put_pixel(x, y, label_color(label));
        }
    }
}

fn last_nonempty(tally: &SentimentTally) -> SentimentLabel {
    SentimentLabel::ALL.into_iter()
        .rev()
        .find(|label| tally.get(*label) > 0)
        .unwrap_or(SentimentLabel::Neutral)
}

fn fill_rect(image: &mut RgbaImage, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>) {
    for py in y.max(0)..(y + height as i64).min(image.height() as i64) {
        for px in x.max(0)..(x + width as i64).min(image.width() as i64) {
            image.put_pixel(px as u32, py as u32, color);
        }
    }
}

fn fitting_scale(text: &str, preferred: u32, width: u32) -> u32 {
    (1..=preferred)
        .rev()
        .find(|scale| text_width(text, *scale) <= width)
        .unwrap_or(1)
}
