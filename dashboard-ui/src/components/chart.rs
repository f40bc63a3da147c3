//! Chart Component
//!
//! Terminations per area as a grouped bar chart on an HTML5 canvas.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Canvas element id
pub const CHART_ELEMENT_ID: &str = "myChart";

pub const CHART_TITLE: &str = "Estado de Terminaciones por Área";

pub const AREAS: [&str; 5] = ["Área 1", "Área 2", "Área 3", "Área 4", "Área 5"];

/// (label, colour, values per area)
pub const SERIES: [(&str, &str, [u32; 5]); 3] = [
    ("Completados", "#28a745", [25, 18, 22, 19, 10]),
    ("Pendientes", "#ffc107", [8, 12, 6, 10, 6]),
    ("Retrasados", "#dc3545", [3, 5, 4, 6, 2]),
];

const MARGIN_LEFT: f64 = 50.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 70.0;
const MARGIN_BOTTOM: f64 = 40.0;

/// Plot area inside the canvas
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plot {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Plot {
    pub fn for_canvas(width: f64, height: f64) -> Self {
        Self {
            x: MARGIN_LEFT,
            y: MARGIN_TOP,
            width: width - MARGIN_LEFT - MARGIN_RIGHT,
            height: height - MARGIN_TOP - MARGIN_BOTTOM,
        }
    }

    fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: &'static str,
}

/// Top of the y axis: the largest value rounded up to a multiple of 5
pub fn axis_max() -> u32 {
    let max = SERIES
        .iter()
        .flat_map(|(_, _, data)| data.iter().copied())
        .max()
        .unwrap_or(0);
    (max.div_ceil(5) * 5).max(5)
}

/// Bars grouped by area, one per series, bottom-aligned on the plot
pub fn bar_rects(plot: Plot) -> Vec<BarRect> {
    let group_width = plot.width / AREAS.len() as f64;
    let bar_width = group_width * 0.8 / SERIES.len() as f64;
    let scale = plot.height / axis_max() as f64;

    let mut rects = Vec::with_capacity(AREAS.len() * SERIES.len());
    for area in 0..AREAS.len() {
        let group_x = plot.x + group_width * area as f64 + group_width * 0.1;
        for (s, (_, color, data)) in SERIES.iter().enumerate() {
            let height = data[area] as f64 * scale;
            rects.push(BarRect {
                x: group_x + bar_width * s as f64,
                y: plot.bottom() - height,
                width: bar_width,
                height,
                color: *color,
            });
        }
    }
    rects
}

/// Terminations-by-area chart component
#[component]
pub fn TerminationsChart() -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();

    canvas_ref.on_load(move |canvas| {
        draw_chart(&canvas);
    });

    view! {
        <div class="chart-container">
            <canvas
                id=CHART_ELEMENT_ID
                node_ref=canvas_ref
                width="800"
                height="400"
                style="width: 100%"
            />
        </div>
    }
}

/// Draw the chart on canvas
fn draw_chart(canvas: &HtmlCanvasElement) {
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => return,
        },
        _ => return,
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    let plot = Plot::for_canvas(width, height);

    // Clear canvas
    ctx.set_fill_style(&"#ffffff".into());
    ctx.fill_rect(0.0, 0.0, width, height);

    // Title
    ctx.set_fill_style(&"#212529".into());
    ctx.set_font("bold 16px sans-serif");
    ctx.set_text_align("center");
    let _ = ctx.fill_text(CHART_TITLE, width / 2.0, 24.0);

    // Legend, top
    ctx.set_font("12px sans-serif");
    ctx.set_text_align("left");
    let legend_width = 120.0;
    let legend_x = width / 2.0 - legend_width * SERIES.len() as f64 / 2.0;
    for (i, (label, color, _)) in SERIES.iter().enumerate() {
        let x = legend_x + legend_width * i as f64;
        ctx.set_fill_style(&(*color).into());
        ctx.fill_rect(x, 38.0, 30.0, 12.0);
        ctx.set_fill_style(&"#212529".into());
        let _ = ctx.fill_text(label, x + 36.0, 49.0);
    }

    // Grid lines and y labels
    let max = axis_max();
    let steps = 5;
    ctx.set_stroke_style(&"#dee2e6".into());
    ctx.set_line_width(1.0);
    ctx.set_text_align("right");
    for i in 0..=steps {
        let y = plot.bottom() - plot.height * i as f64 / steps as f64;
        ctx.begin_path();
        ctx.move_to(plot.x, y);
        ctx.line_to(plot.x + plot.width, y);
        ctx.stroke();

        let value = max * i / steps;
        ctx.set_fill_style(&"#6c757d".into());
        let _ = ctx.fill_text(&value.to_string(), plot.x - 8.0, y + 4.0);
    }

    // Bars
    for rect in bar_rects(plot) {
        ctx.set_fill_style(&rect.color.into());
        ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    // Area labels
    ctx.set_text_align("center");
    ctx.set_fill_style(&"#212529".into());
    let group_width = plot.width / AREAS.len() as f64;
    for (i, area) in AREAS.iter().enumerate() {
        let x = plot.x + group_width * (i as f64 + 0.5);
        let _ = ctx.fill_text(area, x, plot.bottom() + 20.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot() -> Plot {
        Plot::for_canvas(800.0, 400.0)
    }

    #[test]
    fn test_axis_max() {
        assert_eq!(axis_max(), 25);
    }

    #[test]
    fn test_bar_count_and_order() {
        let rects = bar_rects(plot());
        assert_eq!(rects.len(), 15);
        assert_eq!(rects[0].color, "#28a745");
        assert_eq!(rects[1].color, "#ffc107");
        assert_eq!(rects[2].color, "#dc3545");
        assert!(rects[3].x > rects[2].x);
    }

    #[test]
    fn test_tallest_bar_fills_plot() {
        let plot = plot();
        let rects = bar_rects(plot);

        // Completados, Área 1 = 25 = axis max
        assert!((rects[0].y - plot.y).abs() < 1e-9);
        assert!((rects[0].height - plot.height).abs() < 1e-9);

        // Bars sit on the x axis
        assert!(rects.iter().all(|r| (r.y + r.height - (plot.y + plot.height)).abs() < 1e-9));
    }

    #[test]
    fn test_bars_inside_plot() {
        let plot = plot();
        for rect in bar_rects(plot) {
            assert!(rect.x >= plot.x);
            assert!(rect.x + rect.width <= plot.x + plot.width + 1e-9);
        }
    }
}
