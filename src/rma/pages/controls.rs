use super::view::Text;

/// Kind of node in a page's control tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Button,
    Input,
    Toggle,
    Slider,
    RadioGroup,
    Radio,
    /// Plain structural container
    Group,
    /// Transient confirmation dialog; its direct controls ignore the global disable
    Dialog,
}

impl ControlKind {
    pub fn is_interactive(&self) -> bool {
        !matches!(self, ControlKind::Group | ControlKind::Dialog)
    }
}

/// Where a control lives, decided by its closest container ancestor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlHost {
    Page,
    Dialog,
}

#[derive(Debug, Clone)]
pub struct ControlNode {
    pub id: String,
    pub kind: ControlKind,
    pub label: Text,
    /// Toggle/radio selection state
    pub checked: bool,
    /// Dialog visibility; other kinds ignore it
    pub open: bool,
    /// Disabled by the page itself (precondition unmet or action in flight)
    locked: bool,
    /// Disabled by the global disable signal
    frozen: bool,
    children: Vec<ControlNode>,
}

impl ControlNode {
    fn new(id: impl Into<String>, kind: ControlKind, label: Text) -> Self {
        Self {
            id: id.into(),
            kind,
            label,
            checked: false,
            open: false,
            locked: false,
            frozen: false,
            children: Vec::new(),
        }
    }

    pub fn button(id: impl Into<String>, label: impl Into<Text>) -> Self {
        Self::new(id, ControlKind::Button, label.into())
    }

    pub fn toggle(id: impl Into<String>, label: impl Into<Text>) -> Self {
        Self::new(id, ControlKind::Toggle, label.into())
    }

    pub fn radio(id: impl Into<String>, label: impl Into<Text>) -> Self {
        Self::new(id, ControlKind::Radio, label.into())
    }

    pub fn radio_group(id: impl Into<String>, radios: Vec<ControlNode>) -> Self {
        Self::new(id, ControlKind::RadioGroup, Text::new("radioGroup")).with_children(radios)
    }

    pub fn group(id: impl Into<String>, children: Vec<ControlNode>) -> Self {
        Self::new(id, ControlKind::Group, Text::new("group")).with_children(children)
    }

    pub fn dialog(id: impl Into<String>, label: impl Into<Text>, children: Vec<ControlNode>) -> Self {
        Self::new(id, ControlKind::Dialog, label.into()).with_children(children)
    }

    pub fn with_children(mut self, children: Vec<ControlNode>) -> Self {
        self.children = children;
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn opened(mut self) -> Self {
        self.open = true;
        self
    }

    pub fn children(&self) -> &[ControlNode] {
        &self.children
    }

    pub fn is_disabled(&self) -> bool {
        self.kind.is_interactive() && (self.frozen || self.locked)
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Apply the global disable flag to this subtree
    pub fn apply_all_buttons_disabled(&mut self, disabled: bool) {
        self.propagate(disabled, ControlHost::Page);
    }

    fn propagate(&mut self, disabled: bool, host: ControlHost) {
        self.frozen = disabled && host == ControlHost::Page;
        let child_host = self.child_host(host);
        for child in &mut self.children {
            child.propagate(disabled, child_host);
        }
    }

    fn child_host(&self, host: ControlHost) -> ControlHost {
        match self.kind {
            ControlKind::Dialog => ControlHost::Dialog,
            ControlKind::Group => ControlHost::Page,
            _ => host,
        }
    }

    pub fn find(&self, id: &str) -> Option<&ControlNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut ControlNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Every interactive control with the host that decides its disable exemption
    pub fn interactive(&self) -> Vec<(&ControlNode, ControlHost)> {
        let mut out = Vec::new();
        self.walk(ControlHost::Page, true, &mut out);
        out
    }

    /// Interactive controls currently shown (controls in closed dialogs are hidden)
    pub fn visible(&self) -> Vec<(&ControlNode, ControlHost)> {
        let mut out = Vec::new();
        self.walk(ControlHost::Page, false, &mut out);
        out
    }

    /// Controls that can take focus: those of an open dialog if one is shown.
    /// Radio groups are reached through their radios.
    pub fn focusable(&self) -> Vec<&ControlNode> {
        let visible = self.visible();
        let modal = visible.iter().any(|(_, host)| *host == ControlHost::Dialog);
        visible
            .into_iter()
            .filter(|(node, host)| {
                node.kind != ControlKind::RadioGroup && (!modal || *host == ControlHost::Dialog)
            })
            .map(|(node, _)| node)
            .collect()
    }

    fn walk<'a>(
        &'a self,
        host: ControlHost,
        include_hidden: bool,
        out: &mut Vec<(&'a ControlNode, ControlHost)>,
    ) {
        if self.kind == ControlKind::Dialog && !self.open && !include_hidden {
            return;
        }
        if self.kind.is_interactive() {
            out.push((self, host));
        }
        let child_host = self.child_host(host);
        for child in &self.children {
            child.walk(child_host, include_hidden, out);
        }
    }

    /// Whether input aimed at `id` should reach the page
    pub fn is_actionable(&self, id: &str) -> bool {
        self.focusable()
            .into_iter()
            .any(|node| node.id == id && !node.is_disabled())
    }

    pub fn open_dialog(&mut self, id: &str, open: bool) {
        if let Some(node) = self.find_mut(id) {
            if node.kind == ControlKind::Dialog {
                node.open = open;
            }
        }
    }

    /// Check `id` and clear its siblings within the same radio group
    pub fn select_radio(&mut self, id: &str) -> bool {
        if self.kind == ControlKind::RadioGroup && self.children.iter().any(|c| c.id == id) {
            for radio in &mut self.children {
                radio.checked = radio.id == id;
            }
            return true;
        }
        self.children.iter_mut().any(|child| child.select_radio(id))
    }

    pub fn checked_radio(&self, group: &str) -> Option<&str> {
        self.find(group)?
            .children
            .iter()
            .find(|radio| radio.checked)
            .map(|radio| radio.id.as_str())
    }
}
