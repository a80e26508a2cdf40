use egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::document::Document;
use crate::geometry::curves::outline;
use crate::selection::Selection;
use crate::shape::{ShapeId, ShapeKind};

/// Backend that turns shapes into pixels.
///
/// Implementations read coordinates through the document handle they are
/// given; `dx`/`dy` offset everything for previews.
pub trait Renderer {
    type DrawContext;

    fn draw_shape(&mut self, dc: &mut Self::DrawContext, doc: &Document, id: ShapeId, dx: f64, dy: f64);

    /// Handle marker of a point.
    fn draw_point(&mut self, dc: &mut Self::DrawContext, doc: &Document, id: ShapeId, dx: f64, dy: f64);
}

impl Document {
    /// Draws a shape. Groups draw their children; invisible shapes draw nothing.
    pub fn draw<R: Renderer>(&self, renderer: &mut R, dc: &mut R::DrawContext, id: ShapeId, dx: f64, dy: f64) {
        let Some(shape) = self.get(id) else {
            return;
        };
        if !shape.state.is_visible() {
            return;
        }
        match &shape.kind {
            ShapeKind::Group(group) => {
                for child in group.shapes() {
                    self.draw(renderer, dc, *child, dx, dy);
                }
            }
            _ => renderer.draw_shape(dc, self, id, dx, dy),
        }
    }

    fn owner_chain_selected(&self, id: ShapeId, selection: &Selection) -> bool {
        let mut owner = self.get(id).and_then(|shape| shape.owner);
        while let Some(current) = owner {
            if selection.contains(current) {
                return true;
            }
            owner = self.get(current).and_then(|shape| shape.owner);
        }
        false
    }

    /// Draws the handles of a shape's points that are selected, or all of
    /// them when the shape is selected. Connector points only show when
    /// their owning group is selected.
    pub fn draw_points<R: Renderer>(
        &self,
        renderer: &mut R,
        dc: &mut R::DrawContext,
        id: ShapeId,
        selection: &Selection,
        dx: f64,
        dy: f64,
    ) {
        self.draw_points_inner(renderer, dc, id, selection, false, dx, dy);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_points_inner<R: Renderer>(
        &self,
        renderer: &mut R,
        dc: &mut R::DrawContext,
        id: ShapeId,
        selection: &Selection,
        ancestor_selected: bool,
        dx: f64,
        dy: f64,
    ) {
        let Some(shape) = self.get(id) else {
            return;
        };
        let selected = ancestor_selected || selection.contains(id);
        match &shape.kind {
            ShapeKind::Point(_) => {
                let visible = if shape.state.is_connector() {
                    selection.contains(id) || self.owner_chain_selected(id, selection)
                } else {
                    selected
                };
                if visible {
                    renderer.draw_point(dc, self, id, dx, dy);
                }
            }
            ShapeKind::Group(group) => {
                for member in group.members() {
                    self.draw_points_inner(renderer, dc, member, selection, selected, dx, dy);
                }
            }
            kind => {
                for point in kind.direct_points() {
                    let connector = self.get(point).is_some_and(|p| p.state.is_connector());
                    let visible = if connector {
                        selection.contains(point) || self.owner_chain_selected(point, selection)
                    } else {
                        selected || selection.contains(point)
                    };
                    if visible {
                        renderer.draw_point(dc, self, point, dx, dy);
                    }
                }
            }
        }
    }
}

/// Paints shapes with an [`egui::Painter`]. Curves are flattened to polylines.
#[derive(Debug, Clone)]
pub struct EguiRenderer {
    /// Screen position of the document origin.
    pub origin: Pos2,
    pub stroke: Stroke,
    pub fill: Color32,
    pub guide_stroke: Stroke,
    pub highlight_stroke: Stroke,
    pub point_radius: f32,
    pub hovered: Option<ShapeId>,
}

impl Default for EguiRenderer {
    fn default() -> Self {
        Self {
            origin: Pos2::ZERO,
            stroke: Stroke::new(2.0, Color32::from_gray(30)),
            fill: Color32::from_rgb(200, 220, 255),
            guide_stroke: Stroke::new(1.0, Color32::from_rgb(0, 150, 255)),
            highlight_stroke: Stroke::new(3.0, Color32::from_rgb(255, 140, 0)),
            point_radius: 4.0,
            hovered: None,
        }
    }
}

impl EguiRenderer {
    pub fn new(origin: Pos2) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    fn to_screen(&self, (x, y): (f64, f64), dx: f64, dy: f64) -> Pos2 {
        Pos2::new(self.origin.x + (x + dx) as f32, self.origin.y + (y + dy) as f32)
    }

    fn corners(&self, doc: &Document, a: ShapeId, b: ShapeId, dx: f64, dy: f64) -> Option<Rect> {
        let a = self.to_screen(doc.position(a)?, dx, dy);
        let b = self.to_screen(doc.position(b)?, dx, dy);
        Some(Rect::from_two_pos(a, b))
    }
}

impl Renderer for EguiRenderer {
    type DrawContext = Painter;

    fn draw_shape(&mut self, painter: &mut Painter, doc: &Document, id: ShapeId, dx: f64, dy: f64) {
        let Some(shape) = doc.get(id) else {
            return;
        };
        let is_guide = shape
            .style
            .as_ref()
            .is_some_and(|style| style.0 == "guide" || style.0 == "selection");
        let stroke = if is_guide {
            self.guide_stroke
        } else if self.hovered == Some(id) {
            self.highlight_stroke
        } else if shape.is_stroked {
            self.stroke
        } else {
            Stroke::NONE
        };

        match &shape.kind {
            ShapeKind::Point(point) => {
                let center = self.to_screen((point.x, point.y), dx, dy);
                let color = if stroke == Stroke::NONE { self.stroke.color } else { stroke.color };
                painter.circle_filled(center, self.point_radius, color);
            }
            ShapeKind::Rectangle(rect) => {
                if let Some(rect) = self.corners(doc, rect.top_left, rect.bottom_right, dx, dy) {
                    if shape.is_filled {
                        painter.rect_filled(rect, 0.0, self.fill);
                    }
                    painter.rect_stroke(rect, 0.0, stroke);
                }
            }
            ShapeKind::Text(text) => {
                if let Some(rect) = self.corners(doc, text.top_left, text.bottom_right, dx, dy) {
                    painter.rect_stroke(rect, 0.0, self.guide_stroke);
                    painter.text(
                        rect.left_top(),
                        egui::Align2::LEFT_TOP,
                        &text.text,
                        egui::FontId::proportional(14.0),
                        self.stroke.color,
                    );
                }
            }
            ShapeKind::Image(image) => {
                if let Some(rect) = self.corners(doc, image.top_left, image.bottom_right, dx, dy) {
                    painter.rect_filled(rect, 0.0, Color32::from_gray(200));
                    painter.rect_stroke(rect, 0.0, Stroke::new(1.0, Color32::from_gray(100)));
                }
            }
            ShapeKind::Group(_) => {}
            _ => {
                for polyline in outline(doc, id) {
                    let points: Vec<Pos2> = polyline
                        .into_iter()
                        .map(|position| self.to_screen(position, dx, dy))
                        .collect();
                    if shape.is_filled && matches!(shape.kind, ShapeKind::Ellipse(_)) {
                        painter.add(egui::Shape::convex_polygon(points, self.fill, stroke));
                    } else {
                        painter.add(egui::Shape::line(points, stroke));
                    }
                }
            }
        }
    }

    fn draw_point(&mut self, painter: &mut Painter, doc: &Document, id: ShapeId, dx: f64, dy: f64) {
        let Some(position) = doc.position(id) else {
            return;
        };
        let center = self.to_screen(position, dx, dy);
        let connector = doc.get(id).is_some_and(|shape| shape.state.is_connector());
        let color = if connector {
            Color32::from_rgb(220, 40, 40)
        } else {
            self.guide_stroke.color
        };
        let rect = Rect::from_center_size(center, egui::vec2(self.point_radius * 2.0, self.point_radius * 2.0));
        painter.rect_stroke(rect, 0.0, Stroke::new(1.5, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{ShapeDefaults, ShapeState, factory};

    #[derive(Default)]
    struct Recorder {
        shapes: Vec<ShapeId>,
        points: Vec<ShapeId>,
    }

    impl Renderer for Recorder {
        type DrawContext = ();

        fn draw_shape(&mut self, _: &mut (), _: &Document, id: ShapeId, _: f64, _: f64) {
            self.shapes.push(id);
        }

        fn draw_point(&mut self, _: &mut (), _: &Document, id: ShapeId, _: f64, _: f64) {
            self.points.push(id);
        }
    }

    #[test]
    fn test_invisible_shape_is_skipped() {
        let mut doc = Document::new();
        let line = factory::create_line(&mut doc, 0.0, 0.0, 1.0, 1.0, &ShapeDefaults::default());
        doc.get_mut(line).unwrap().state.remove(ShapeState::VISIBLE);

        let mut recorder = Recorder::default();
        doc.draw(&mut recorder, &mut (), line, 0.0, 0.0);
        assert!(recorder.shapes.is_empty());
    }

    #[test]
    fn test_group_draws_children() {
        let mut doc = Document::new();
        let a = factory::create_line(&mut doc, 0.0, 0.0, 1.0, 1.0, &ShapeDefaults::default());
        let b = factory::create_rectangle(&mut doc, 0.0, 0.0, 1.0, 1.0, &ShapeDefaults::default());
        let group = doc.group(&[a, b], "g", None).unwrap();

        let mut recorder = Recorder::default();
        doc.draw(&mut recorder, &mut (), group, 0.0, 0.0);
        assert_eq!(recorder.shapes, vec![a, b]);
    }

    #[test]
    fn test_points_follow_selection() {
        let mut doc = Document::new();
        let line = factory::create_line(&mut doc, 0.0, 0.0, 1.0, 1.0, &ShapeDefaults::default());
        let points = doc.get_points(line);
        let mut selection = Selection::new();

        let mut recorder = Recorder::default();
        doc.draw_points(&mut recorder, &mut (), line, &selection, 0.0, 0.0);
        assert!(recorder.points.is_empty());

        selection.select(points[1]);
        doc.draw_points(&mut recorder, &mut (), line, &selection, 0.0, 0.0);
        assert_eq!(recorder.points, vec![points[1]]);

        recorder.points.clear();
        selection.select(line);
        doc.draw_points(&mut recorder, &mut (), line, &selection, 0.0, 0.0);
        assert_eq!(recorder.points, points);
    }

    #[test]
    fn test_connector_shows_only_with_its_group() {
        let mut doc = Document::new();
        let pin = factory::create_point(&mut doc, 5.0, 5.0);
        let rect = factory::create_rectangle(&mut doc, 0.0, 0.0, 10.0, 10.0, &ShapeDefaults::default());
        let group = doc.group(&[rect, pin], "g", None).unwrap();
        let line = factory::create_line(&mut doc, 5.0, 5.0, 20.0, 20.0, &ShapeDefaults::default());
        let start = doc.get_points(line)[0];
        doc.replace_point(line, start, pin);

        let mut selection = Selection::new();
        selection.select(line);
        let mut recorder = Recorder::default();
        doc.draw_points(&mut recorder, &mut (), line, &selection, 0.0, 0.0);
        assert!(!recorder.points.contains(&pin));

        selection.select(group);
        recorder.points.clear();
        doc.draw_points(&mut recorder, &mut (), line, &selection, 0.0, 0.0);
        assert!(recorder.points.contains(&pin));
    }

    #[test]
    fn test_egui_renderer_paints_without_text() {
        let ctx = egui::Context::default();
        let rect = Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        let mut painter = Painter::new(ctx, egui::LayerId::background(), rect);
        let mut doc = Document::new();
        let ellipse = factory::create_ellipse(&mut doc, 10.0, 10.0, 40.0, 30.0, &ShapeDefaults::default());
        let line = factory::create_line(&mut doc, 0.0, 0.0, 50.0, 50.0, &ShapeDefaults::default());

        let mut renderer = EguiRenderer::default();
        doc.draw(&mut renderer, &mut painter, ellipse, 0.0, 0.0);
        doc.draw(&mut renderer, &mut painter, line, 5.0, 5.0);
        renderer.draw_point(&mut painter, &doc, doc.get_points(line)[0], 0.0, 0.0);
    }
}
