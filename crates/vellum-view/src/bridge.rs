use vellum_core::{Attrs, Node, NodeRole};

use crate::view::SharedView;

/// A view decoration handed to the bridge at construction. Stored for the
/// widget's benefit; the bridge itself never interprets it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    pub from: usize,
    pub to: usize,
    pub attrs: Attrs,
}

/// Host element flavor the rendered widget mounts into, chosen from the
/// node's registered role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostElement {
    Inline,
    Block,
}

/// Everything a widget render sees. `position` is resolved through the
/// bridge's position closure on every render; earlier positions are
/// invalidated by any earlier edit in the same document.
#[derive(Debug)]
pub struct WidgetProps<'a> {
    pub node: &'a Node,
    pub is_selected: bool,
    pub is_editable: bool,
    pub position: Option<usize>,
}

/// The render contract one widget-backed node type satisfies.
pub trait WidgetComponent {
    type Rendered;

    fn render(&mut self, props: WidgetProps<'_>) -> Self::Rendered;
}

pub type GetPosition = Box<dyn Fn() -> Option<usize>>;

pub struct ComponentViewArgs {
    pub view: SharedView,
    pub node: Node,
    pub get_position: GetPosition,
    pub decorations: Vec<Decoration>,
}

/// Binds one widget-backed node position to a live rendered widget. The
/// bridge exclusively owns the rendered handle; the node snapshot is
/// replaced wholesale on update and never mutated in place.
pub struct ComponentView<C: WidgetComponent> {
    component: C,
    node: Node,
    view: SharedView,
    get_position: GetPosition,
    decorations: Vec<Decoration>,
    host: HostElement,
    is_selected: bool,
    rendered: Option<C::Rendered>,
}

impl<C: WidgetComponent> ComponentView<C> {
    pub fn new(component: C, args: ComponentViewArgs) -> Self {
        let ComponentViewArgs {
            view,
            node,
            get_position,
            decorations,
        } = args;

        let host = {
            let view = view.borrow();
            match view.editor().registry().node_spec(node.kind()).map(|s| s.role) {
                Some(NodeRole::Inline) => HostElement::Inline,
                Some(NodeRole::Block) | None => HostElement::Block,
            }
        };

        let mut bridge = Self {
            component,
            node,
            view,
            get_position,
            decorations,
            host,
            is_selected: false,
            rendered: None,
        };
        bridge.render_element();
        bridge
    }

    fn render_element(&mut self) {
        let position = (self.get_position)();
        let is_editable = self.view.borrow().is_editable();
        let rendered = self.component.render(WidgetProps {
            node: &self.node,
            is_selected: self.is_selected,
            is_editable,
            position,
        });
        self.rendered = Some(rendered);
    }

    /// Replaces the node snapshot and re-renders. A node of a different
    /// kind is rejected so the host tears the view down and rebuilds it
    /// instead of rendering a widget with a mismatched attribute shape.
    pub fn update(&mut self, node: Node) -> bool {
        if node.kind() != self.node.kind() {
            return false;
        }

        self.node = node;
        self.render_element();
        true
    }

    pub fn select_node(&mut self) {
        if self.view.borrow().is_editable() {
            self.is_selected = true;
            self.render_element();
        }
    }

    pub fn deselect_node(&mut self) {
        if self.view.borrow().is_editable() {
            self.is_selected = false;
            self.render_element();
        }
    }

    /// All DOM-level events inside the widget belong to the widget.
    pub fn stop_event(&self) -> bool {
        true
    }

    /// Mutations inside the widget's subtree are not document edits.
    pub fn ignore_mutation(&self) -> bool {
        true
    }

    pub fn destroy(&mut self) {
        self.rendered = None;
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn host_element(&self) -> HostElement {
        self.host
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    pub fn rendered(&self) -> Option<&C::Rendered> {
        self.rendered.as_ref()
    }
}
