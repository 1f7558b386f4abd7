use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::FusionPolicy;
use crate::fusion::fuse;
use crate::model::{AnalysisResult, MultimodalResult};

/// Per-session result history and the fusion derived from it.
///
/// The list and the fusion are only ever changed together, so the stored
/// fusion always describes exactly the visible list.
#[derive(Debug, Clone, Default)]
pub struct Session {
    policy: FusionPolicy,
    results: Vec<AnalysisResult>,
    fusion: Option<MultimodalResult>,
}

impl Session {
    pub fn new(policy: FusionPolicy) -> Self {
        Self {
            policy,
            results: Vec::new(),
            fusion: None,
        }
    }

    pub fn policy(&self) -> &FusionPolicy {
        &self.policy
    }

    /// Append a result and recompute fusion over the whole history.
    pub fn append(&mut self, result: AnalysisResult) -> &MultimodalResult {
        log::info!(
            "session: +{} {} ({:.1}%), {} result(s) total",
            result.modality,
            result.verdict,
            result.confidence,
            self.results.len() + 1,
        );
        self.results.push(result);
        match fuse(&self.results, &self.policy) {
            Some(fusion) => &*self.fusion.insert(fusion),
            None => unreachable!("fusion over a non-empty history"),
        }
    }

    /// Drop every result and the fusion.
    pub fn clear(&mut self) {
        log::info!("session: cleared {} result(s)", self.results.len());
        self.results.clear();
        self.fusion = None;
    }

    pub fn current(&self) -> (&[AnalysisResult], Option<&MultimodalResult>) {
        (&self.results, self.fusion.as_ref())
    }

    pub fn results(&self) -> &[AnalysisResult] {
        &self.results
    }

    pub fn fusion(&self) -> Option<&MultimodalResult> {
        self.fusion.as_ref()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// A session shared between concurrent oracle calls. Each result is applied
/// under one lock, in the order the calls complete.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    pub fn new(policy: FusionPolicy) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Session::new(policy))),
        }
    }

    /// Append a result and return the recomputed fusion.
    pub fn append(&self, result: AnalysisResult) -> MultimodalResult {
        self.inner.lock().append(result).clone()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Consistent copy of the list and the fusion computed from it.
    pub fn snapshot(&self) -> (Vec<AnalysisResult>, Option<MultimodalResult>) {
        let session = self.inner.lock();
        let (results, fusion) = session.current();
        (results.to_vec(), fusion.cloned())
    }

    /// Run `f` with exclusive access to the underlying session.
    pub fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Modality, Verdict};

    fn result(modality: Modality, verdict: Verdict, confidence: f64) -> AnalysisResult {
        AnalysisResult {
            modality,
            verdict,
            confidence,
            explanation: "x".into(),
            details: Vec::new(),
            flags: Vec::new(),
        }
    }

    #[test]
    fn new_session_is_empty() {
        let s = Session::default();
        let (results, fusion) = s.current();
        assert!(results.is_empty());
        assert!(fusion.is_none());
    }

    #[test]
    fn append_recomputes_over_full_history() {
        let mut s = Session::default();
        let first = s.append(result(Modality::Text, Verdict::Authentic, 90.0)).clone();
        assert_eq!(first.modalities.len(), 1);
        assert_eq!(first.overall_confidence, 90);

        let second = s.append(result(Modality::Text, Verdict::Authentic, 70.0)).clone();
        assert_eq!(second.modalities.len(), 2);
        assert_eq!(second.overall_confidence, 80);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn fusion_matches_visible_list() {
        let mut s = Session::default();
        s.append(result(Modality::Image, Verdict::Fake, 95.0));
        s.append(result(Modality::Url, Verdict::Authentic, 100.0));
        let (results, fusion) = s.current();
        let fusion = fusion.unwrap();
        assert_eq!(fusion.modalities, results);
        assert_eq!(fusion.overall_verdict, Verdict::Fake);
    }

    #[test]
    fn clear_resets_both() {
        let mut s = Session::default();
        s.append(result(Modality::Audio, Verdict::Suspicious, 50.0));
        s.clear();
        assert!(s.is_empty());
        assert!(s.fusion().is_none());
    }

    #[test]
    fn shared_session_applies_concurrent_appends() {
        let shared = SharedSession::default();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    shared.append(result(Modality::Text, Verdict::Authentic, 60.0 + i as f64));
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let (results, fusion) = shared.snapshot();
        assert_eq!(results.len(), 8);
        assert_eq!(fusion.unwrap().modalities, results);
    }

    #[test]
    fn with_runs_under_one_lock() {
        let shared = SharedSession::default();
        shared.append(result(Modality::Video, Verdict::Authentic, 90.0));

        // Append and read back in one critical section.
        let (len, verdict) = shared.with(|s| {
            let verdict = s.append(result(Modality::Image, Verdict::Fake, 80.0)).overall_verdict;
            (s.len(), verdict)
        });
        assert_eq!(len, 2);
        assert_eq!(verdict, Verdict::Fake);

        shared.with(Session::clear);
        let (results, fusion) = shared.snapshot();
        assert!(results.is_empty());
        assert!(fusion.is_none());
    }
}
