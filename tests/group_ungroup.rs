use eframe_draw::document::{Document, PropertyBinder};
use eframe_draw::shape::{Property, ShapeDefaults, ShapeId, ShapeState, factory};
use proptest::prelude::*;

fn on_layer(doc: &mut Document, id: ShapeId) -> ShapeId {
    doc.current_layer_mut().add(id);
    id
}

#[test]
fn test_group_splits_points_into_connectors() {
    let mut doc = Document::new();
    let layer = doc.current_layer_id();
    let rect = factory::create_rectangle(&mut doc, 0.0, 0.0, 10.0, 10.0, &ShapeDefaults::default());
    let rect = on_layer(&mut doc, rect);
    let point = factory::create_point(&mut doc, 5.0, 5.0);
    let point = on_layer(&mut doc, point);

    let group = doc.group(&[rect, point], "g", Some(layer)).unwrap();

    let shape = doc.get(group).unwrap();
    assert_eq!(shape.name, "g");
    let members = shape.as_group().unwrap();
    assert_eq!(members.shapes(), &[rect]);
    assert_eq!(members.connectors(), &[point]);

    let connector = doc.get(point).unwrap();
    assert!(connector.state.contains(ShapeState::CONNECTOR | ShapeState::NONE));
    assert!(!connector.state.intersects(ShapeState::INPUT | ShapeState::OUTPUT));
    assert_eq!(connector.owner, Some(group));
    assert!(!doc.get(rect).unwrap().state.is_standalone());
    assert_eq!(doc.get(rect).unwrap().owner, Some(group));

    assert_eq!(doc.current_layer().shapes(), &[group]);
}

#[test]
fn test_ungroup_restores_standalone_shapes() {
    let mut doc = Document::new();
    let layer = doc.current_layer_id();
    let rect = factory::create_rectangle(&mut doc, 0.0, 0.0, 10.0, 10.0, &ShapeDefaults::default());
    let rect = on_layer(&mut doc, rect);
    let point = factory::create_point(&mut doc, 5.0, 5.0);
    let point = on_layer(&mut doc, point);
    let group = doc.group(&[rect, point], "g", Some(layer)).unwrap();

    doc.ungroup(group, Some(layer)).unwrap();

    let shapes = doc.current_layer().shapes();
    assert!(shapes.contains(&rect));
    assert!(shapes.contains(&point));
    assert!(!shapes.contains(&group));

    let rect_shape = doc.get(rect).unwrap();
    assert!(rect_shape.state.is_standalone());
    assert_eq!(rect_shape.owner, None);

    let point_shape = doc.get(point).unwrap();
    assert!(point_shape.state.is_standalone());
    assert!(!point_shape.state.intersects(ShapeState::CONNECTOR_FLAGS));
    assert_eq!(point_shape.owner, None);
}

#[test]
fn test_ungroup_of_plain_shape_is_noop() {
    let mut doc = Document::new();
    let layer = doc.current_layer_id();
    let line = factory::create_line(&mut doc, 0.0, 0.0, 10.0, 10.0, &ShapeDefaults::default());
    let line = on_layer(&mut doc, line);

    doc.ungroup(line, Some(layer)).unwrap();

    assert_eq!(doc.current_layer().shapes(), &[line]);
    assert!(doc.get(line).unwrap().state.is_standalone());
}

#[test]
fn test_group_rejects_unknown_shape() {
    let mut doc = Document::new();
    assert!(doc.group(&[ShapeId(99)], "g", None).is_err());
}

#[test]
fn test_group_rejects_locked_shape() {
    let mut doc = Document::new();
    let rect = factory::create_rectangle(&mut doc, 0.0, 0.0, 10.0, 10.0, &ShapeDefaults::default());
    doc.get_mut(rect).unwrap().state.insert(ShapeState::LOCKED);

    assert!(doc.group(&[rect], "g", None).is_err());
    assert_eq!(doc.get(rect).unwrap().owner, None);
}

#[test]
fn test_group_points_list_children_then_connectors() {
    let mut doc = Document::new();
    let line = factory::create_line(&mut doc, 0.0, 0.0, 10.0, 10.0, &ShapeDefaults::default());
    let pin = factory::create_point(&mut doc, 3.0, 3.0);
    let group = doc.group(&[pin, line], "g", None).unwrap();

    let mut expected = doc.get_points(line);
    expected.push(pin);
    assert_eq!(doc.get_points(group), expected);
}

#[test]
fn test_connector_moves_only_with_group() {
    let mut doc = Document::new();
    let rect = factory::create_rectangle(&mut doc, 0.0, 0.0, 10.0, 10.0, &ShapeDefaults::default());
    let pin = factory::create_point(&mut doc, 10.0, 5.0);
    let group = doc.group(&[rect, pin], "g", None).unwrap();
    let line = factory::create_line(&mut doc, 10.0, 5.0, 30.0, 5.0, &ShapeDefaults::default());
    let start = doc.get_points(line)[0];
    doc.replace_point(line, start, pin);

    doc.move_shape(line, 1.0, 1.0);
    assert_eq!(doc.position(pin), Some((10.0, 5.0)));

    doc.move_shape(group, 2.0, 0.0);
    assert_eq!(doc.position(pin), Some((12.0, 5.0)));
}

#[derive(Default)]
struct RecordingBinder {
    visited: Vec<(ShapeId, String)>,
}

impl PropertyBinder for RecordingBinder {
    fn bind(&mut self, shape: ShapeId, property: &mut Property) {
        self.visited.push((shape, property.name.clone()));
        property.value = format!("bound:{}", property.value);
    }
}

#[test]
fn test_bind_visits_children_then_connectors() {
    let mut doc = Document::new();
    let rect = factory::create_rectangle(&mut doc, 0.0, 0.0, 10.0, 10.0, &ShapeDefaults::default());
    doc.get_mut(rect).unwrap().properties = vec![Property::new("width", "10"), Property::new("height", "10")];
    let pin = factory::create_point(&mut doc, 10.0, 5.0);
    doc.get_mut(pin).unwrap().properties = vec![Property::new("signal", "in")];
    let group = doc.group(&[pin, rect], "g", None).unwrap();
    doc.get_mut(group).unwrap().properties = vec![Property::new("label", "g")];

    let mut binder = RecordingBinder::default();
    doc.bind(group, &mut binder);

    assert_eq!(
        binder.visited,
        vec![
            (group, "label".to_string()),
            (rect, "width".to_string()),
            (rect, "height".to_string()),
            (pin, "signal".to_string()),
        ]
    );
    assert_eq!(doc.get(rect).unwrap().properties[0].value, "bound:10");
    assert_eq!(doc.get(pin).unwrap().properties[0].value, "bound:in");
    let values: Vec<&str> = doc
        .shapes_properties(group)
        .unwrap()
        .iter()
        .map(|property| property.value.as_str())
        .collect();
    assert_eq!(values, vec!["bound:10", "bound:10", "bound:in"]);
}

proptest! {
    #[test]
    fn prop_group_then_ungroup_keeps_every_shape(rects in 0usize..5, points in 0usize..5) {
        prop_assume!(rects + points > 0);
        let mut doc = Document::new();
        let layer = doc.current_layer_id();
        let mut ids = Vec::new();
        for i in 0..rects {
            let offset = i as f64 * 20.0;
            let rect = factory::create_rectangle(&mut doc, offset, 0.0, offset + 10.0, 10.0, &ShapeDefaults::default());
            ids.push(on_layer(&mut doc, rect));
        }
        for i in 0..points {
            let point = factory::create_point(&mut doc, i as f64, 50.0);
            ids.push(on_layer(&mut doc, point));
        }

        let group = doc.group(&ids, "g", Some(layer)).unwrap();
        prop_assert_eq!(doc.current_layer().len(), 1);
        doc.ungroup(group, Some(layer)).unwrap();

        let shapes = doc.current_layer().shapes();
        prop_assert_eq!(shapes.len(), ids.len());
        for id in &ids {
            prop_assert!(shapes.contains(id));
            let shape = doc.get(*id).unwrap();
            prop_assert!(shape.state.is_standalone());
            prop_assert!(!shape.state.is_connector());
            prop_assert_eq!(shape.owner, None);
        }
    }
}
