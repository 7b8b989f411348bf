//! In-terminal route map
//!
//! Plots the user, the current stop and the next stop over the Philippine
//! coastline, with the same legs as the exported Leaflet document: a solid
//! leg to the current stop and a dashed leg on to the next one.

use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as Segment, Map, MapResolution, Points};
use ratatui::widgets::Block;
use signgo_core::{Coordinates, MapDestinations, PH_PORTS};

use crate::ui::Theme;

/// Longitude/latitude box covering the archipelago
const PH_LNG: [f64; 2] = [116.5, 127.0];
const PH_LAT: [f64; 2] = [4.5, 21.0];
const PADDING_DEG: f64 = 0.5;
const DASHES: usize = 12;

/// Map widget inputs
pub struct RouteMap<'a> {
    pub user: Coordinates,
    pub destinations: Option<&'a MapDestinations>,
}

impl RouteMap<'_> {
    pub fn render(&self, frame: &mut Frame, area: Rect, block: Block, theme: &Theme) {
        let mut points = vec![self.user];
        if let Some(d) = self.destinations {
            points.extend(d.current.iter().chain(d.next.iter()).map(|p| p.coords));
        }
        let (x_bounds, y_bounds) = bounds(&points);

        let canvas = Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| self.paint(ctx, theme));

        frame.render_widget(canvas, area);
    }

    fn paint(&self, ctx: &mut Context, theme: &Theme) {
        ctx.draw(&Map {
            color: theme.map_land,
            resolution: MapResolution::High,
        });
        let ports: Vec<(f64, f64)> = PH_PORTS.iter().map(|p| (p.lng, p.lat)).collect();
        ctx.draw(&Points {
            coords: &ports,
            color: theme.text_muted,
        });
        ctx.layer();

        let current = self.destinations.and_then(|d| d.current.as_ref());
        let next = self.destinations.and_then(|d| d.next.as_ref());

        if let Some(current) = current {
            ctx.draw(&Segment {
                x1: self.user.lng,
                y1: self.user.lat,
                x2: current.coords.lng,
                y2: current.coords.lat,
                color: theme.map_user,
            });
        }
        if let (Some(current), Some(next)) = (current, next) {
            for (x1, y1, x2, y2) in dashed(current.coords, next.coords, DASHES) {
                ctx.draw(&Segment {
                    x1,
                    y1,
                    x2,
                    y2,
                    color: theme.map_next,
                });
            }
        }
        ctx.layer();

        ctx.draw(&Circle {
            x: self.user.lng,
            y: self.user.lat,
            radius: 0.12,
            color: theme.map_user,
        });
        ctx.print(self.user.lng, self.user.lat, Span::styled(" You", theme.info()));

        if let Some(current) = current {
            pin(ctx, current.coords, &current.label, theme.map_current);
        }
        if let Some(next) = next {
            pin(ctx, next.coords, &next.label, theme.map_next);
        }
    }
}

fn pin(ctx: &mut Context, at: Coordinates, label: &str, color: Color) {
    ctx.draw(&Points {
        coords: &[(at.lng, at.lat)],
        color,
    });
    ctx.print(
        at.lng,
        at.lat,
        Span::styled(format!("● {}", label), Style::default().fg(color)),
    );
}

/// Canvas bounds: the archipelago, grown to fit every point
fn bounds(points: &[Coordinates]) -> ([f64; 2], [f64; 2]) {
    let mut lng = PH_LNG;
    let mut lat = PH_LAT;
    for p in points {
        lng[0] = lng[0].min(p.lng - PADDING_DEG);
        lng[1] = lng[1].max(p.lng + PADDING_DEG);
        lat[0] = lat[0].min(p.lat - PADDING_DEG);
        lat[1] = lat[1].max(p.lat + PADDING_DEG);
    }
    (lng, lat)
}

/// Every other piece of `from → to` cut into `pieces`
fn dashed(from: Coordinates, to: Coordinates, pieces: usize) -> Vec<(f64, f64, f64, f64)> {
    let pieces = pieces.max(1);
    let at = |t: f64| {
        (
            from.lng + (to.lng - from.lng) * t,
            from.lat + (to.lat - from.lat) * t,
        )
    };

    (0..pieces)
        .step_by(2)
        .map(|i| {
            let (x1, y1) = at(i as f64 / pieces as f64);
            let (x2, y2) = at((i + 1) as f64 / pieces as f64);
            (x1, y1, x2, y2)
        })
        .collect()
}
