use std::cell::Cell;
use std::rc::Rc;

use vellum_core::{
    ChildConstraint, Document, Editor, Extension, ExtensionRegistry, Node, NodeRole, NodeSpec,
    Point, SchemaContribution, Selection,
};
use vellum_view::{
    ComponentView, ComponentViewArgs, EditorView, HostElement, SharedView, WidgetComponent,
    WidgetProps,
};

/// Records exactly what each render saw.
struct ProbeWidget;

#[derive(Debug, Clone, PartialEq)]
struct Rendered {
    kind: String,
    is_selected: bool,
    is_editable: bool,
    position: Option<usize>,
}

impl WidgetComponent for ProbeWidget {
    type Rendered = Rendered;

    fn render(&mut self, props: WidgetProps<'_>) -> Rendered {
        Rendered {
            kind: props.node.kind().to_string(),
            is_selected: props.is_selected,
            is_editable: props.is_editable,
            position: props.position,
        }
    }
}

fn shared_view(editable: bool) -> SharedView {
    let doc = Document {
        children: vec![Node::image("/a.png"), Node::paragraph("hello")],
    };
    let selection = Selection::collapsed(Point::new(vec![1, 0], 0));
    let editor = Editor::new(doc, selection, ExtensionRegistry::standard());
    let view = if editable {
        EditorView::new(editor)
    } else {
        EditorView::read_only(editor)
    };
    view.shared()
}

fn image_bridge(view: SharedView) -> ComponentView<ProbeWidget> {
    ComponentView::new(
        ProbeWidget,
        ComponentViewArgs {
            view,
            node: Node::image("/a.png"),
            get_position: Box::new(|| Some(0)),
            decorations: Vec::new(),
        },
    )
}

#[test]
fn construct_renders_once_with_the_node_snapshot() {
    let bridge = image_bridge(shared_view(true));

    let rendered = bridge.rendered().unwrap();
    assert_eq!(rendered.kind, "image");
    assert!(!rendered.is_selected);
    assert!(rendered.is_editable);
    assert_eq!(rendered.position, Some(0));
    assert_eq!(bridge.host_element(), HostElement::Block);
}

#[test]
fn update_with_the_same_snapshot_is_idempotent() {
    let mut bridge = image_bridge(shared_view(true));

    assert!(bridge.update(Node::image("/a.png")));
    let first = bridge.rendered().unwrap().clone();
    assert!(bridge.update(Node::image("/a.png")));
    let second = bridge.rendered().unwrap().clone();

    assert_eq!(first, second);
}

#[test]
fn update_rejects_a_node_of_another_kind() {
    let mut bridge = image_bridge(shared_view(true));

    assert!(!bridge.update(Node::paragraph("oops")));
    assert_eq!(bridge.node().kind(), "image");
    assert_eq!(bridge.rendered().unwrap().kind, "image");
}

#[test]
fn update_rerenders_from_the_new_snapshot() {
    let mut bridge = image_bridge(shared_view(true));

    assert!(bridge.update(Node::image("/b.png")));
    let Node::Void(v) = bridge.node() else {
        panic!("expected void node");
    };
    assert_eq!(v.attrs.get("src").and_then(|s| s.as_str()), Some("/b.png"));
}

#[test]
fn selection_toggles_rerender_when_editable() {
    let mut bridge = image_bridge(shared_view(true));

    bridge.select_node();
    assert!(bridge.is_selected());
    assert!(bridge.rendered().unwrap().is_selected);

    bridge.deselect_node();
    assert!(!bridge.is_selected());
    assert!(!bridge.rendered().unwrap().is_selected);
}

#[test]
fn read_only_views_never_show_selection() {
    let mut bridge = image_bridge(shared_view(false));

    bridge.select_node();
    assert!(!bridge.is_selected());
    assert!(!bridge.rendered().unwrap().is_selected);
    assert!(!bridge.rendered().unwrap().is_editable);
}

#[test]
fn events_and_mutations_belong_to_the_widget() {
    let bridge = image_bridge(shared_view(true));
    assert!(bridge.stop_event());
    assert!(bridge.ignore_mutation());
}

#[test]
fn destroy_is_idempotent() {
    let mut bridge = image_bridge(shared_view(true));

    bridge.destroy();
    assert!(bridge.rendered().is_none());
    bridge.destroy();
    assert!(bridge.rendered().is_none());
}

#[test]
fn position_is_resolved_fresh_on_every_render() {
    let position = Rc::new(Cell::new(Some(0usize)));
    let probe = position.clone();

    let mut bridge = ComponentView::new(
        ProbeWidget,
        ComponentViewArgs {
            view: shared_view(true),
            node: Node::image("/a.png"),
            get_position: Box::new(move || probe.get()),
            decorations: Vec::new(),
        },
    );
    assert_eq!(bridge.rendered().unwrap().position, Some(0));

    // An earlier edit shifted the node; the next render sees the new spot.
    position.set(Some(7));
    assert!(bridge.update(Node::image("/a.png")));
    assert_eq!(bridge.rendered().unwrap().position, Some(7));

    position.set(None);
    bridge.select_node();
    assert_eq!(bridge.rendered().unwrap().position, None);
}

#[test]
fn inline_nodes_get_an_inline_host_element() {
    struct Badge;

    impl Extension for Badge {
        fn name(&self) -> &'static str {
            "badge"
        }

        fn schema(&self) -> SchemaContribution {
            SchemaContribution::Node(NodeSpec {
                role: NodeRole::Inline,
                is_void: true,
                children: ChildConstraint::None,
                widget: true,
            })
        }
    }

    let registry = ExtensionRegistry::new(vec![
        Box::new(vellum_core::Paragraph),
        Box::new(Badge),
    ])
    .unwrap();
    let doc = Document {
        children: vec![Node::paragraph("hello")],
    };
    let selection = Selection::collapsed(Point::new(vec![0, 0], 0));
    let view = EditorView::new(Editor::new(doc, selection, registry)).shared();

    let badge = Node::Void(vellum_core::VoidNode {
        kind: "badge".to_string(),
        attrs: vellum_core::Attrs::default(),
    });
    let bridge = ComponentView::new(
        ProbeWidget,
        ComponentViewArgs {
            view,
            node: badge,
            get_position: Box::new(|| None),
            decorations: Vec::new(),
        },
    );

    assert_eq!(bridge.host_element(), HostElement::Inline);
}
