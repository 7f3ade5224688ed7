//! Caller-side state for incremental map updates.
//!
//! A [`ClusterSession`] remembers what is on screen so each viewport change
//! turns into a minimal [`AnnotationDelta`]. It performs no debouncing or
//! scheduling; the caller decides when to call [`ClusterSession::update`].

use crate::engine::{ClusterEngine, ClusterStats};
use crate::reconcile::{AnnotationDelta, AnnotationReconciler};
use geocluster_types::{Annotation, Poi, Viewport};

/// Engine plus the annotation set currently displayed.
///
/// # Examples
///
/// ```
/// use geocluster::{ClusterSession, Poi, Viewport};
///
/// let points = vec![
///     Poi::new("Gyeryongsan", 36.3440, 127.2050, ()),
///     Poi::new("Songnisan", 36.5430, 127.8700, ()),
/// ];
/// let viewport = Viewport::new(36.45, 127.5, 1.0, 1.5, 20_000.0);
///
/// let mut session = ClusterSession::default();
/// let first = session.update(&points, &viewport);
/// assert_eq!(first.to_add.len(), 2);
///
/// // Nothing moved, nothing to redraw
/// assert!(session.update(&points, &viewport).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ClusterSession<P> {
    engine: ClusterEngine,
    reconciler: AnnotationReconciler,
    displayed: Vec<Annotation<P>>,
    last_stats: ClusterStats,
}

impl<P> Default for ClusterSession<P> {
    fn default() -> Self {
        Self::new(ClusterEngine::new())
    }
}

impl<P> ClusterSession<P> {
    pub fn new(engine: ClusterEngine) -> Self {
        let reconciler = AnnotationReconciler::from(engine.config());
        Self {
            engine,
            reconciler,
            displayed: Vec::new(),
            last_stats: ClusterStats::default(),
        }
    }

    pub fn engine(&self) -> &ClusterEngine {
        &self.engine
    }

    /// Annotations currently on screen, as tracked by this session.
    pub fn displayed(&self) -> &[Annotation<P>] {
        &self.displayed
    }

    /// Counters from the most recent [`update`](Self::update).
    pub fn last_stats(&self) -> ClusterStats {
        self.last_stats
    }
}

impl<P: Clone> ClusterSession<P> {
    /// Recluster for `viewport` and return what the renderer must change.
    ///
    /// Annotations that match one already on screen keep their displayed
    /// version.
    pub fn update(&mut self, points: &[Poi<P>], viewport: &Viewport) -> AnnotationDelta<P> {
        let output = self.engine.cluster_with_report(points, viewport);
        self.last_stats = output.stats;

        self.reconciler
            .reconcile(&mut self.displayed, &output.annotations)
    }

    /// Forget everything on screen, returning the removals to perform.
    pub fn clear(&mut self) -> AnnotationDelta<P> {
        AnnotationDelta {
            to_add: Vec::new(),
            to_remove: std::mem::take(&mut self.displayed),
        }
    }
}
