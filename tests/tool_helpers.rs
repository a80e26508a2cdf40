use eframe_draw::editor::Editor;
use eframe_draw::event::{EditorEvent, EventLog};
use eframe_draw::options::EditorOptions;
use eframe_draw::path::SegmentKind;
use eframe_draw::shape::{Shape, ShapeId, ShapeKind};
use eframe_draw::tools::{PathSubTool, Tool, ToolState, ToolType};

fn free_editor() -> Editor {
    Editor::new(EditorOptions {
        snap_to_grid: false,
        ..EditorOptions::default()
    })
}

fn connecting_editor() -> Editor {
    Editor::new(EditorOptions {
        snap_to_grid: false,
        try_to_connect: true,
        ..EditorOptions::default()
    })
}

fn only_shape(editor: &Editor) -> ShapeId {
    let shapes = editor.context.document.current_layer().shapes();
    assert_eq!(shapes.len(), 1);
    shapes[0]
}

fn path_tool_state(editor: &Editor) -> (Option<ShapeId>, usize) {
    match editor.active_tool() {
        Some(ToolType::Path(tool)) => (tool.path(), tool.completed_segments(&editor.context.document)),
        _ => panic!("path tool is not active"),
    }
}

#[test]
fn test_line_snaps_both_clicks_to_grid() {
    let mut editor = Editor::default();
    editor.set_tool("line");

    editor.left_down(10.0, 10.0);
    assert_eq!(editor.context.document.working_layer().len(), 1);
    editor.left_down(50.0, 60.0);

    let doc = &editor.context.document;
    let line = only_shape(&editor);
    assert!(doc.working_layer().is_empty());
    let points = doc.get_points(line);
    assert_eq!(doc.position(points[0]), Some((15.0, 15.0)));
    assert_eq!(doc.position(points[1]), Some((45.0, 60.0)));
    assert_eq!(editor.context.history.undo_len(), 1);
}

#[test]
fn test_end_point_follows_pointer_before_second_click() {
    let mut editor = free_editor();
    editor.set_tool("rectangle");
    editor.left_down(0.0, 0.0);
    editor.pointer_move(40.0, 25.0);

    let doc = &editor.context.document;
    let rect = doc.working_layer().shapes()[0];
    let points = doc.get_points(rect);
    assert_eq!(doc.position(points[0]), Some((0.0, 0.0)));
    assert_eq!(doc.position(points[1]), Some((40.0, 25.0)));
    assert_eq!(editor.active_tool().map(|tool| tool.state()), Some(ToolState::One));
}

#[test]
fn test_right_down_aborts_and_discards() {
    let mut editor = free_editor();
    editor.set_tool("cubic-bezier");
    editor.left_down(0.0, 0.0);
    editor.left_down(50.0, 0.0);
    let bezier = editor.context.document.working_layer().shapes()[0];
    let points = editor.context.document.get_points(bezier);
    assert!(!editor.context.document.helper_layer().is_empty());

    editor.right_down(10.0, 10.0);

    let doc = &editor.context.document;
    assert!(doc.working_layer().is_empty());
    assert!(doc.helper_layer().is_empty());
    assert!(doc.current_layer().is_empty());
    assert!(!doc.contains(bezier));
    assert!(points.iter().all(|point| !doc.contains(*point)));
    assert!(!editor.context.history.can_undo());
    assert_eq!(editor.active_tool().map(|tool| tool.state()), Some(ToolState::None));
}

#[test]
fn test_switching_tool_aborts_gesture() {
    let mut editor = free_editor();
    let log = EventLog::new();
    editor.subscribe(Box::new(log.clone()));
    editor.set_tool("line");
    editor.left_down(0.0, 0.0);

    editor.set_tool("ellipse");

    assert!(editor.context.document.working_layer().is_empty());
    assert!(editor.context.document.current_layer().is_empty());
    let changes: Vec<EditorEvent> = log
        .events()
        .into_iter()
        .filter(|event| matches!(event, EditorEvent::ToolChanged { .. }))
        .collect();
    assert_eq!(
        changes,
        vec![
            EditorEvent::ToolChanged { old: None, new: "line" },
            EditorEvent::ToolChanged {
                old: Some("line"),
                new: "ellipse"
            },
        ]
    );
}

#[test]
fn test_point_tool_commits_on_single_click() {
    let mut editor = Editor::default();
    editor.set_tool("point");
    editor.left_down(31.0, 44.0);

    let point = only_shape(&editor);
    let shape = editor.context.document.get(point).unwrap();
    assert!(shape.is_point());
    assert!(shape.state.is_standalone());
    assert_eq!(editor.context.document.position(point), Some((30.0, 45.0)));
}

#[test]
fn test_connect_reuses_existing_point() {
    let mut editor = connecting_editor();
    editor.set_tool("point");
    editor.left_down(30.0, 30.0);
    let anchor = only_shape(&editor);

    editor.set_tool("line");
    editor.left_down(32.0, 31.0);
    editor.left_down(80.0, 80.0);

    let doc = &editor.context.document;
    let shapes = doc.current_layer().shapes();
    assert_eq!(shapes.len(), 2);
    let line = shapes[1];
    let points = doc.get_points(line);
    assert_eq!(points[0], anchor);
    assert_eq!(doc.position(points[0]), Some((30.0, 30.0)));

    editor.context.document.move_points(&[anchor], 5.0, 0.0);
    let doc = &editor.context.document;
    assert_eq!(doc.position(doc.get_points(line)[0]), Some((35.0, 30.0)));
}

#[test]
fn test_connected_slot_does_not_follow_pointer() {
    let mut editor = connecting_editor();
    editor.set_tool("point");
    editor.left_down(100.0, 100.0);
    let anchor = only_shape(&editor);

    editor.set_tool("rectangle");
    editor.left_down(0.0, 0.0);
    editor.pointer_move(60.0, 60.0);
    editor.left_down(101.0, 99.0);

    let doc = &editor.context.document;
    let rect = doc.current_layer().shapes()[1];
    assert_eq!(doc.get_points(rect)[1], anchor);
    assert_eq!(doc.position(anchor), Some((100.0, 100.0)));
}

#[test]
fn test_arc_ends_are_pulled_onto_ellipse() {
    let mut editor = free_editor();
    editor.set_tool("arc");
    editor.left_down(0.0, 0.0);
    editor.left_down(60.0, 30.0);
    assert!(!editor.context.document.helper_layer().is_empty());
    editor.left_down(80.0, 15.0);
    editor.left_down(30.0, -20.0);

    let doc = &editor.context.document;
    let arc = only_shape(&editor);
    assert!(doc.helper_layer().is_empty());
    let points = doc.get_points(arc);
    for point in &points[2..] {
        let (x, y) = doc.position(*point).unwrap();
        let (nx, ny) = ((x - 30.0) / 30.0, (y - 15.0) / 15.0);
        assert!((nx * nx + ny * ny - 1.0).abs() < 1e-9, "({x}, {y}) is off the ellipse");
    }
}

#[test]
fn test_quadratic_bezier_needs_three_clicks() {
    let mut editor = free_editor();
    editor.set_tool("quadratic-bezier");
    editor.left_down(0.0, 0.0);
    editor.left_down(40.0, 0.0);
    assert!(editor.context.document.current_layer().is_empty());
    editor.pointer_move(20.0, 30.0);
    editor.left_down(20.0, 30.0);

    let doc = &editor.context.document;
    let bezier = only_shape(&editor);
    let points = doc.get_points(bezier);
    assert_eq!(doc.position(points[0]), Some((0.0, 0.0)));
    assert_eq!(doc.position(points[1]), Some((20.0, 30.0)));
    assert_eq!(doc.position(points[2]), Some((40.0, 0.0)));
}

#[test]
fn test_text_tool_uses_default_text() {
    let mut editor = Editor::new(EditorOptions {
        default_text: "Label".to_string(),
        ..EditorOptions::default()
    });
    editor.set_tool("text");
    editor.left_down(0.0, 0.0);
    editor.left_down(90.0, 30.0);

    let text = only_shape(&editor);
    match &editor.context.document.get(text).unwrap().kind {
        ShapeKind::Text(shape) => assert_eq!(shape.text, "Label"),
        other => panic!("expected text, got {}", other.name()),
    }
}

#[test]
fn test_path_sub_tool_switch_drops_incomplete_segment() {
    let mut editor = Editor::default();
    editor.set_tool("path");

    editor.left_down(0.0, 0.0);
    editor.left_down(30.0, 0.0);
    assert_eq!(path_tool_state(&editor).1, 1);

    editor.set_path_sub_tool(PathSubTool::CubicBezier);
    editor.left_down(60.0, 0.0);
    editor.left_down(90.0, 30.0);
    assert!(!editor.context.document.helper_layer().is_empty());

    editor.set_path_sub_tool(PathSubTool::Arc);
    editor.left_down(120.0, 0.0);

    let (path, completed) = path_tool_state(&editor);
    let path = path.unwrap();
    assert_eq!(completed, 1);
    let doc = &editor.context.document;
    assert!(doc.helper_layer().is_empty());
    let geometry = &doc.get(path).and_then(Shape::as_path).unwrap().geometry;
    let kinds: Vec<&SegmentKind> = geometry.figures[0].segments.iter().map(|s| &s.kind).collect();
    assert_eq!(kinds.len(), 2);
    assert!(matches!(kinds[0], SegmentKind::Line { .. }));
    assert!(matches!(kinds[1], SegmentKind::Arc { .. }));

    editor.right_down(0.0, 0.0);

    let doc = &editor.context.document;
    assert_eq!(doc.current_layer().shapes(), &[path]);
    assert!(doc.working_layer().is_empty());
    let geometry = &doc.get(path).and_then(Shape::as_path).unwrap().geometry;
    assert_eq!(geometry.segment_count(), 1);
    assert_eq!(doc.position(geometry.current_point().unwrap()), Some((30.0, 0.0)));
}

#[test]
fn test_path_without_segments_is_discarded() {
    let mut editor = free_editor();
    editor.set_tool("path");
    editor.left_down(0.0, 0.0);
    let (path, _) = path_tool_state(&editor);
    let path = path.unwrap();

    editor.right_down(0.0, 0.0);

    let doc = &editor.context.document;
    assert!(doc.current_layer().is_empty());
    assert!(doc.working_layer().is_empty());
    assert!(!doc.contains(path));
}

#[test]
fn test_path_is_kept_when_switching_tools() {
    let mut editor = free_editor();
    editor.set_tool("path");
    editor.left_down(0.0, 0.0);
    editor.left_down(20.0, 0.0);
    editor.left_down(20.0, 20.0);

    editor.set_tool("selection");

    let path = only_shape(&editor);
    let geometry = &editor
        .context
        .document
        .get(path)
        .and_then(Shape::as_path)
        .unwrap()
        .geometry;
    assert_eq!(geometry.segment_count(), 2);
}

#[test]
fn test_path_move_sub_tool_opens_new_figure() {
    let mut editor = free_editor();
    editor.set_tool("path");
    editor.left_down(0.0, 0.0);
    editor.left_down(20.0, 0.0);
    editor.set_path_sub_tool(PathSubTool::Move);
    editor.left_down(100.0, 100.0);
    editor.left_down(120.0, 100.0);
    editor.right_down(0.0, 0.0);

    let path = only_shape(&editor);
    let doc = &editor.context.document;
    let geometry = &doc.get(path).and_then(Shape::as_path).unwrap().geometry;
    let counts: Vec<usize> = geometry.figures.iter().map(|figure| figure.segments.len()).collect();
    assert_eq!(counts, vec![1, 1]);
    assert_eq!(doc.position(geometry.figures[1].start_point), Some((100.0, 100.0)));
    let end = geometry.current_point().unwrap();
    assert_eq!(doc.position(end), Some((120.0, 100.0)));
}

#[test]
fn test_path_move_sub_tool_hands_back_to_previous_kind() {
    let mut editor = free_editor();
    editor.set_tool("path");
    editor.set_path_sub_tool(PathSubTool::QuadraticBezier);
    editor.left_down(0.0, 0.0);
    editor.set_path_sub_tool(PathSubTool::Move);
    editor.left_down(50.0, 50.0);

    match editor.active_tool() {
        Some(ToolType::Path(tool)) => assert_eq!(tool.sub_tool(), PathSubTool::QuadraticBezier),
        _ => panic!("path tool is not active"),
    }
}

#[test]
fn test_path_commit_drops_figures_without_segments() {
    let mut editor = free_editor();
    editor.set_tool("path");
    editor.left_down(0.0, 0.0);
    editor.left_down(20.0, 0.0);
    editor.set_path_sub_tool(PathSubTool::Move);
    editor.left_down(100.0, 100.0);
    editor.set_path_sub_tool(PathSubTool::Move);
    editor.left_down(200.0, 200.0);
    let shapes_before = editor.context.document.shape_count();
    editor.right_down(0.0, 0.0);

    let path = only_shape(&editor);
    let doc = &editor.context.document;
    let geometry = &doc.get(path).and_then(Shape::as_path).unwrap().geometry;
    let counts: Vec<usize> = geometry.figures.iter().map(|figure| figure.segments.len()).collect();
    assert_eq!(counts, vec![1]);
    // Two figure starts plus the in-progress segment end are gone.
    assert_eq!(doc.shape_count(), shapes_before - 3);
}
