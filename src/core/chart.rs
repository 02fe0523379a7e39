use base64::prelude::{Engine as _, BASE64_STANDARD};

/// Labels longer than this are cut and suffixed with "..."
pub const MAX_LABEL_CHARS: usize = 20;

const BAR_COLOR: &str = "#1DB954";
const BACKGROUND: &str = "#191414";
const WIDTH: f64 = 800.0;
const ROW_HEIGHT: f64 = 36.0;
const LABEL_WIDTH: f64 = 220.0;
const TOP: f64 = 50.0;
const BOTTOM: f64 = 40.0;

/// One bar of the duration chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: String,
    pub minutes: f64,
}

/// Shorten a track name for use as a chart label
pub fn truncate_label(name: &str) -> String {
    if name.chars().count() > MAX_LABEL_CHARS {
        let head: String = name.chars().take(MAX_LABEL_CHARS).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

/// Build chart bars from (name, duration_ms) pairs, keeping at most `limit`
pub fn duration_bars<'a>(
    tracks: impl IntoIterator<Item = (&'a str, u64)>,
    limit: usize,
) -> Vec<ChartBar> {
    tracks
        .into_iter()
        .take(limit)
        .map(|(name, duration_ms)| ChartBar {
            label: truncate_label(name),
            minutes: duration_ms as f64 / 60_000.0,
        })
        .collect()
}

/// Render a horizontal bar chart of track durations as an SVG data URI
///
/// The first bar is drawn at the top. Returns `None` when there is nothing
/// to draw.
pub fn render_duration_chart(bars: &[ChartBar]) -> Option<String> {
    if bars.is_empty() {
        return None;
    }

    let height = TOP + BOTTOM + ROW_HEIGHT * bars.len() as f64;
    let plot_width = WIDTH - LABEL_WIDTH - 40.0;
    let max_minutes = bars.iter().map(|b| b.minutes).fold(0.0_f64, f64::max);
    let scale = if max_minutes > 0.0 { plot_width / max_minutes } else { 0.0 };

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = WIDTH,
        h = height
    );
    svg.push_str(&format!(
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        BACKGROUND
    ));
    svg.push_str(&format!(
        r#"<text x="{}" y="30" fill="white" font-family="sans-serif" font-size="18" text-anchor="middle">Top Tracks Duration</text>"#,
        WIDTH / 2.0
    ));

    for (i, bar) in bars.iter().enumerate() {
        let y = TOP + ROW_HEIGHT * i as f64;
        svg.push_str(&format!(
            r#"<text x="{}" y="{}" fill="white" font-family="sans-serif" font-size="12" text-anchor="end">{}</text>"#,
            LABEL_WIDTH - 8.0,
            y + ROW_HEIGHT / 2.0 + 4.0,
            escape_xml(&bar.label)
        ));
        svg.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{:.1}" height="{}" fill="{}"><title>{:.2} min</title></rect>"#,
            LABEL_WIDTH,
            y + 6.0,
            bar.minutes.max(0.0) * scale,
            ROW_HEIGHT - 12.0,
            BAR_COLOR,
            bar.minutes
        ));
    }

    svg.push_str(&format!(
        r#"<text x="{}" y="{}" fill="white" font-family="sans-serif" font-size="12" text-anchor="middle">Duration (minutes)</text>"#,
        LABEL_WIDTH + plot_width / 2.0,
        height - 12.0
    ));
    svg.push_str("</svg>");

    Some(format!(
        "data:image/svg+xml;base64,{}",
        BASE64_STANDARD.encode(svg.as_bytes())
    ))
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(uri: &str) -> String {
        let encoded = uri.strip_prefix("data:image/svg+xml;base64,").unwrap();
        String::from_utf8(BASE64_STANDARD.decode(encoded).unwrap()).unwrap()
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Short"), "Short");
        assert_eq!(truncate_label("exactly twenty chars"), "exactly twenty chars");
        assert_eq!(
            truncate_label("A much longer song title here"),
            "A much longer song t..."
        );
    }

    #[test]
    fn test_duration_bars_convert_to_minutes() {
        let bars = duration_bars(vec![("One", 180_000), ("Two", 90_000), ("Three", 60_000)], 2);

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].minutes, 3.0);
        assert_eq!(bars[1].minutes, 1.5);
    }

    #[test]
    fn test_empty_chart_is_none() {
        assert!(render_duration_chart(&[]).is_none());
    }

    #[test]
    fn test_chart_escapes_labels() {
        let bars = duration_bars(vec![("Rock & <Roll>", 200_000)], 10);
        let svg = decode(&render_duration_chart(&bars).unwrap());

        assert!(svg.contains("Rock &amp; &lt;Roll&gt;"));
        assert!(svg.contains(BAR_COLOR));
        assert!(svg.starts_with("<svg"));
    }
}
