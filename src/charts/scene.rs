//! Retained scene with keyed marks and eased transitions.
//!
//! Each draw builds a [`SceneTarget`] from scratch; [`RetainedScene::patch`]
//! diffs it against the marks already on screen. Matching keys animate from
//! their current (possibly mid-flight) geometry to the new target, new keys
//! appear in place, and keys missing from the target are dropped.

use std::time::Duration;

use indexmap::IndexMap;
use tracing::trace;

use crate::core::Viewport;
use crate::render::{CirclePrimitive, LinePrimitive, RectPrimitive, RenderFrame, TextPrimitive};

/// Lifecycle of a chart instance: the first draw creates marks, every later
/// draw updates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderPhase {
    #[default]
    Uninitialized,
    Initialized,
}

/// Stable identity of a mark across redraws: a role plus the data slot it
/// is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    pub role: &'static str,
    pub slot: usize,
}

impl NodeKey {
    #[must_use]
    pub const fn new(role: &'static str, slot: usize) -> Self {
        Self { role, slot }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Line(LinePrimitive),
    Rect(RectPrimitive),
    Circle(CirclePrimitive),
    Text(TextPrimitive),
}

impl Mark {
    /// Interpolates geometry towards `to`. Styling and text content take the
    /// target value immediately; mismatched mark kinds snap to the target.
    fn interpolate(&self, to: &Mark, t: f64) -> Mark {
        match (self, to) {
            (Mark::Line(a), Mark::Line(b)) => Mark::Line(LinePrimitive {
                x1: lerp(a.x1, b.x1, t),
                y1: lerp(a.y1, b.y1, t),
                x2: lerp(a.x2, b.x2, t),
                y2: lerp(a.y2, b.y2, t),
                ..*b
            }),
            (Mark::Rect(a), Mark::Rect(b)) => Mark::Rect(RectPrimitive {
                x: lerp(a.x, b.x, t),
                y: lerp(a.y, b.y, t),
                width: lerp(a.width, b.width, t),
                height: lerp(a.height, b.height, t),
                ..*b
            }),
            (Mark::Circle(a), Mark::Circle(b)) => Mark::Circle(CirclePrimitive {
                cx: lerp(a.cx, b.cx, t),
                cy: lerp(a.cy, b.cy, t),
                radius: lerp(a.radius, b.radius, t),
                ..*b
            }),
            (Mark::Text(a), Mark::Text(b)) => Mark::Text(TextPrimitive {
                x: lerp(a.x, b.x, t),
                y: lerp(a.y, b.y, t),
                ..b.clone()
            }),
            _ => to.clone(),
        }
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Cubic ease-in-out over `t` in `[0, 1]`.
#[must_use]
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub key: NodeKey,
    pub mark: Mark,
    pub visible: bool,
}

/// Desired end state of one draw, in paint order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneTarget {
    nodes: Vec<SceneNode>,
}

impl SceneTarget {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: NodeKey, mark: Mark, visible: bool) {
        self.nodes.push(SceneNode { key, mark, visible });
    }

    pub fn line(&mut self, key: NodeKey, line: LinePrimitive, visible: bool) {
        self.push(key, Mark::Line(line), visible);
    }

    pub fn rect(&mut self, key: NodeKey, rect: RectPrimitive, visible: bool) {
        self.push(key, Mark::Rect(rect), visible);
    }

    pub fn circle(&mut self, key: NodeKey, circle: CirclePrimitive, visible: bool) {
        self.push(key, Mark::Circle(circle), visible);
    }

    /// Blank text (for example a label from a missing category) is kept as a
    /// hidden node so its slot survives until the label comes back.
    pub fn text(&mut self, key: NodeKey, text: TextPrimitive, visible: bool) {
        let visible = visible && !text.text.is_empty();
        self.push(key, Mark::Text(text), visible);
    }

    #[must_use]
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct AnimatedNode {
    from: Mark,
    to: Mark,
    visible: bool,
}

/// Marks currently owned by one chart instance.
#[derive(Debug, Clone, PartialEq)]
pub struct RetainedScene {
    nodes: IndexMap<NodeKey, AnimatedNode>,
    phase: RenderPhase,
    duration: Duration,
    elapsed: Duration,
}

impl RetainedScene {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            nodes: IndexMap::new(),
            phase: RenderPhase::Uninitialized,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    #[must_use]
    pub fn transition_duration(&self) -> Duration {
        self.duration
    }

    /// Applies a new target.
    ///
    /// The first patch places every mark at its target and moves the scene to
    /// `Initialized`. Later patches start a transition from the currently
    /// sampled geometry, which re-targets any transition still in flight.
    pub fn patch(&mut self, target: SceneTarget) {
        match self.phase {
            RenderPhase::Uninitialized => {
                self.replace(target);
            }
            RenderPhase::Initialized => {
                let progress = self.progress();
                let mut next = IndexMap::with_capacity(target.nodes.len());
                let mut retained = 0usize;
                for node in target.nodes {
                    let from = match self.nodes.get(&node.key) {
                        Some(current) => {
                            retained += 1;
                            current.from.interpolate(&current.to, progress)
                        }
                        None => node.mark.clone(),
                    };
                    next.insert(
                        node.key,
                        AnimatedNode {
                            from,
                            to: node.mark,
                            visible: node.visible,
                        },
                    );
                }
                trace!(
                    retained,
                    entered = next.len() - retained,
                    exited = self.nodes.len() - retained,
                    "patched retained scene"
                );
                self.nodes = next;
                self.elapsed = Duration::ZERO;
            }
        }
    }

    /// Rebuilds the scene at its target without animating.
    pub fn replace(&mut self, target: SceneTarget) {
        self.nodes = target
            .nodes
            .into_iter()
            .map(|node| {
                (
                    node.key,
                    AnimatedNode {
                        from: node.mark.clone(),
                        to: node.mark,
                        visible: node.visible,
                    },
                )
            })
            .collect();
        self.elapsed = self.duration;
        self.phase = RenderPhase::Initialized;
    }

    /// Moves the transition clock forward.
    pub fn advance(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta).min(self.duration);
    }

    /// Jumps to the end of the current transition.
    pub fn settle(&mut self) {
        self.elapsed = self.duration;
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Eased progress of the current transition in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        ease_cubic_in_out(self.elapsed.as_secs_f64() / self.duration.as_secs_f64())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn visible_len(&self) -> usize {
        self.nodes.values().filter(|node| node.visible).count()
    }

    /// Current sampled mark for `key`, with its visibility.
    #[must_use]
    pub fn node(&self, key: NodeKey) -> Option<(Mark, bool)> {
        let progress = self.progress();
        self.nodes
            .get(&key)
            .map(|node| (node.from.interpolate(&node.to, progress), node.visible))
    }

    /// Keys of every node bound to `role`, in paint order.
    #[must_use]
    pub fn slots(&self, role: &str) -> Vec<usize> {
        self.nodes
            .keys()
            .filter(|key| key.role == role)
            .map(|key| key.slot)
            .collect()
    }

    /// Samples the visible marks into a backend frame.
    #[must_use]
    pub fn frame(&self, viewport: Viewport) -> RenderFrame {
        let progress = self.progress();
        let mut frame = RenderFrame::new(viewport);
        for node in self.nodes.values().filter(|node| node.visible) {
            match node.from.interpolate(&node.to, progress) {
                Mark::Line(line) => frame.lines.push(line),
                Mark::Rect(rect) => frame.rects.push(rect),
                Mark::Circle(circle) => frame.circles.push(circle),
                Mark::Text(text) => frame.texts.push(text),
            }
        }
        frame
    }
}
