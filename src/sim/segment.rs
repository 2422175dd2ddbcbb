//! Forest data model
//!
//! A segment's position is always relative to its parent: it only stores its
//! own length and its angle in the parent's frame. World positions are
//! recovered by the walker each frame.

/// Marks a root segment as a named navigation anchor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorTag {
    pub id: String,
    pub label: String,
}

/// One rigid unit of the tree, simulated as a 1-DOF angular oscillator
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Unique within a controller's lifetime; phase-offsets the wind noise
    pub index: u32,
    /// Forest generation this segment was built for
    pub generation: u64,
    /// Base-to-tip distance
    pub length: f32,
    /// Current angle in degrees relative to the parent's forward direction
    pub angle: f32,
    /// Angle the spring pulls back toward
    pub rest_angle: f32,
    /// Degrees per frame
    pub velocity: f32,
    /// Accumulated force for this frame, cleared after integration
    pub acceleration: f32,
    /// Depth from the root (0 = root)
    pub level: u32,
    pub anchor: Option<AnchorTag>,
    pub children: Vec<Segment>,
}

impl Segment {
    pub fn new(index: u32, generation: u64, length: f32, angle: f32, level: u32) -> Self {
        Self {
            index,
            generation,
            length,
            angle,
            rest_angle: angle,
            velocity: 0.0,
            acceleration: 0.0,
            level,
            anchor: None,
            children: Vec::new(),
        }
    }

    /// Add a child at `angle` whose length is `ratio` of this segment's
    pub fn new_child(&mut self, ids: &mut SegmentIds, angle: f32, ratio: f32) -> &mut Segment {
        let child = Segment::new(
            ids.next_id(),
            self.generation,
            self.length * ratio,
            angle,
            self.level + 1,
        );
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Accumulate a force for this frame
    #[inline]
    pub fn apply_force(&mut self, force: f32) {
        self.acceleration += force;
    }

    #[inline]
    pub fn is_anchor(&self) -> bool {
        self.anchor.is_some()
    }

    /// Offset from the rest pose in degrees
    #[inline]
    pub fn displacement(&self) -> f32 {
        self.angle - self.rest_angle
    }

    /// Pre-order traversal of this segment and its descendants
    pub fn iter(&self) -> SegmentIter<'_> {
        SegmentIter { stack: vec![self] }
    }

    /// Number of segments in this subtree (including self)
    pub fn count(&self) -> usize {
        self.iter().count()
    }
}

/// Depth-first, parent-before-children iterator
pub struct SegmentIter<'a> {
    stack: Vec<&'a Segment>,
}

impl<'a> Iterator for SegmentIter<'a> {
    type Item = &'a Segment;

    fn next(&mut self) -> Option<Self::Item> {
        let segment = self.stack.pop()?;
        // Reverse so the first child is visited first
        self.stack.extend(segment.children.iter().rev());
        Some(segment)
    }
}

/// Segment index allocator
#[derive(Debug, Clone)]
pub struct SegmentIds {
    next: u32,
}

impl Default for SegmentIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl SegmentIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new segment index
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }

    /// Index the next allocation will return
    pub fn peek(&self) -> u32 {
        self.next
    }
}

/// All root segments around the scene origin
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forest {
    pub generation: u64,
    pub roots: Vec<Segment>,
}

impl Forest {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            roots: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Every segment, roots in order, each subtree pre-order
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.roots.iter().flat_map(Segment::iter)
    }

    pub fn segment_count(&self) -> usize {
        self.iter().count()
    }

    /// Anchor roots in generation order
    pub fn anchors(&self) -> impl Iterator<Item = &Segment> {
        self.roots.iter().filter(|s| s.is_anchor())
    }

    /// Deepest level present
    pub fn depth(&self) -> u32 {
        self.iter().map(|s| s.level).max().unwrap_or(0)
    }
}
