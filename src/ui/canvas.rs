//! Central canvas UI: the two hemisphere layers.

use super::colors;
use crate::geo::{format_coordinates, FillMesh, ProjectedPath};
use crate::scene::{hemisphere_projection, Element, HemisphereGroup, Primitive, Scene};
use crate::state::{AppState, Hemisphere, Viewport};
use eframe::egui::{
    self, Align2, Color32, FontId, Mesh, Painter, Pos2, Rect, Sense, Shape, Stroke, Vec2,
};
use glam::DVec2;

/// Paints the scene and tracks the pointer.
///
/// Returns the size of the canvas so the caller can detect resizes.
pub fn render_canvas(ctx: &egui::Context, state: &mut AppState, scene: &Scene) -> Viewport {
    let mut size = Viewport::default();

    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            let available_size = ui.available_size();
            let (response, painter) = ui.allocate_painter(available_size, Sense::hover());
            let rect = response.rect;
            size = Viewport::from(rect.size());

            painter.rect_filled(rect, 0.0, colors::canvas::BACKGROUND);

            for group in scene.groups() {
                paint_group(&painter, rect.min, group);
            }

            state.hover = response.hover_pos().and_then(|pos| {
                let local = pos - rect.min;
                hemisphere_projection(Hemisphere::Primary, &state.view, &state.config)
                    .invert(DVec2::new(local.x as f64, local.y as f64))
            });

            if let Some(coord) = state.hover {
                draw_readout(&painter, &rect, coord.x, coord.y);
            }
        });

    size
}

fn paint_group(painter: &Painter, origin: Pos2, group: &HemisphereGroup) {
    let alpha = group.alpha();
    for element in &group.elements {
        paint_element(painter, origin, group.hemisphere, element, alpha);
    }
}

fn paint_element(
    painter: &Painter,
    origin: Pos2,
    hemisphere: Hemisphere,
    element: &Element,
    alpha: f32,
) {
    let (fill, stroke) = colors::element_style(element.class, hemisphere);
    let fill = fill.map(|c| c.gamma_multiply(alpha));
    let stroke = Stroke::new(stroke.width, stroke.color.gamma_multiply(alpha));

    match &element.primitive {
        Primitive::Rect { width, height } => {
            if let Some(fill) = fill {
                let rect = Rect::from_min_size(origin, Vec2::new(*width as f32, *height as f32));
                painter.rect_filled(rect, 0.0, fill);
            }
        }
        Primitive::Path { path, fill: mesh } => {
            if let (Some(mesh), Some(fill)) = (mesh, fill) {
                paint_mesh(painter, origin, mesh, fill);
            }
            if stroke.width > 0.0 {
                paint_strokes(painter, origin, path, stroke);
            }
        }
        Primitive::Text {
            position,
            text,
            font_size,
            fill: text_fill,
            ..
        } => {
            let color = text_fill
                .map(|[r, g, b]| Color32::from_rgb(r, g, b).gamma_multiply(alpha))
                .or(fill)
                .unwrap_or(colors::canvas::LABEL);
            painter.text(
                to_screen(origin, *position),
                Align2::LEFT_BOTTOM,
                text,
                FontId::proportional(*font_size),
                color,
            );
        }
    }
}

fn paint_mesh(painter: &Painter, origin: Pos2, fill_mesh: &FillMesh, color: Color32) {
    if fill_mesh.indices.is_empty() {
        return;
    }
    let mut mesh = Mesh::default();
    for vertex in &fill_mesh.vertices {
        mesh.colored_vertex(to_screen(origin, *vertex), color);
    }
    for triangle in fill_mesh.indices.chunks_exact(3) {
        mesh.add_triangle(triangle[0], triangle[1], triangle[2]);
    }
    painter.add(Shape::mesh(mesh));
}

fn paint_strokes(painter: &Painter, origin: Pos2, path: &ProjectedPath, stroke: Stroke) {
    let screen = |points: &[DVec2]| -> Vec<Pos2> {
        points.iter().map(|p| to_screen(origin, *p)).collect()
    };

    for line in &path.lines {
        if line.len() >= 2 {
            painter.add(Shape::line(screen(line), stroke));
        }
    }
    for polygon in &path.polygons {
        for ring in std::iter::once(&polygon.exterior).chain(&polygon.holes) {
            if ring.len() >= 2 {
                painter.add(Shape::closed_line(screen(ring), stroke));
            }
        }
    }
}

fn draw_readout(painter: &Painter, rect: &Rect, lon: f64, lat: f64) {
    let round = |v: f64| (v * 10.0).round() / 10.0;
    painter.text(
        rect.left_bottom() + Vec2::new(10.0, -10.0),
        Align2::LEFT_BOTTOM,
        format_coordinates(round(lon), round(lat)),
        FontId::monospace(12.0),
        colors::canvas::READOUT,
    );
}

fn to_screen(origin: Pos2, point: DVec2) -> Pos2 {
    origin + Vec2::new(point.x as f32, point.y as f32)
}
