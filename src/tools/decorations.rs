//! Guide lines and handle markers a tool shows on the helper layer.
//!
//! Decorations reference the points of the shape under construction rather
//! than copies, so they track the cursor without being rebuilt on every move.

use crate::document::Document;
use crate::shape::{BoxShape, LineShape, Shape, ShapeDefaults, ShapeId, ShapeKind, StyleKey};

/// One preview element, addressed by slot index into the working shape's points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    /// Straight guide between two slots.
    Guide(usize, usize),
    /// Marker drawn on a slot's point.
    Handle(usize),
    /// Ellipse inscribed in the box spanned by two slots.
    Ellipse(usize, usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placed {
    shape: ShapeId,
    /// Guides and ellipses are shapes of their own; handles reuse the point.
    owned: bool,
}

/// Decorations currently on the helper layer.
#[derive(Debug, Default)]
pub struct Decorations {
    placed: Vec<Placed>,
}

fn guide_defaults() -> ShapeDefaults {
    ShapeDefaults {
        style: Some(StyleKey::new("guide")),
        is_stroked: true,
        is_filled: false,
    }
}

impl Decorations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Replaces whatever is shown with `decorations` over `slots`.
    pub fn show(&mut self, doc: &mut Document, decorations: &[Decoration], slots: &[ShapeId]) {
        self.clear(doc);
        for decoration in decorations {
            let placed = match *decoration {
                Decoration::Guide(a, b) => {
                    let (Some(start), Some(end)) = (slots.get(a), slots.get(b)) else {
                        continue;
                    };
                    let kind = ShapeKind::Line(LineShape {
                        start: *start,
                        end: *end,
                        fixed_length: None,
                    });
                    Placed {
                        shape: doc.insert(Shape::new(kind, &guide_defaults())),
                        owned: true,
                    }
                }
                Decoration::Ellipse(a, b) => {
                    let (Some(top_left), Some(bottom_right)) = (slots.get(a), slots.get(b)) else {
                        continue;
                    };
                    let kind = ShapeKind::Ellipse(BoxShape {
                        top_left: *top_left,
                        bottom_right: *bottom_right,
                    });
                    Placed {
                        shape: doc.insert(Shape::new(kind, &guide_defaults())),
                        owned: true,
                    }
                }
                Decoration::Handle(a) => {
                    let Some(point) = slots.get(a) else {
                        continue;
                    };
                    Placed {
                        shape: *point,
                        owned: false,
                    }
                }
            };
            doc.helper_layer_mut().add(placed.shape);
            self.placed.push(placed);
        }
    }

    /// Takes every decoration off the helper layer.
    pub fn clear(&mut self, doc: &mut Document) {
        for placed in self.placed.drain(..) {
            doc.helper_layer_mut().remove(placed.shape);
            if placed.owned {
                doc.discard(placed.shape);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::factory;

    #[test]
    fn test_guides_alias_points() {
        let mut doc = Document::new();
        let bezier = factory::create_cubic_bezier(&mut doc, [(0.0, 0.0); 4], &ShapeDefaults::default());
        let slots = doc.get_points(bezier);
        let mut decorations = Decorations::new();
        decorations.show(&mut doc, &[Decoration::Guide(0, 1), Decoration::Handle(1)], &slots);

        assert_eq!(doc.helper_layer().len(), 2);
        let guide = doc.helper_layer().shapes()[0];
        assert_eq!(doc.get_points(guide), vec![slots[0], slots[1]]);
        assert_eq!(doc.helper_layer().shapes()[1], slots[1]);

        decorations.clear(&mut doc);
        assert!(doc.helper_layer().is_empty());
        assert!(!doc.contains(guide));
        assert!(doc.contains(slots[1]));
    }
}
