//! Concurrent analysis of many clips.
//!
//! Each clip runs on the blocking pool; a semaphore bounds how many run at
//! once. All workers share one analyzer and therefore one reference profile.

use std::sync::Arc;

use serde::Serialize;
use smash_analysis::{AnalysisRequest, AnalysisResult, SmashAnalyzer};
use smash_core::{AnalysisFailure, Result};
use tokio::sync::Semaphore;

/// One clip waiting to be analysed
#[derive(Debug)]
pub struct ClipJob {
    pub label: String,
    pub request: Result<AnalysisRequest>,
}

/// Result or structured failure for one clip
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Result(Box<AnalysisResult>),
    Failure(AnalysisFailure),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipOutcome {
    pub clip: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ClipOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failure(_))
    }
}

pub struct BatchRunner {
    analyzer: Arc<SmashAnalyzer>,
    semaphore: Arc<Semaphore>,
}

impl BatchRunner {
    pub fn new(analyzer: Arc<SmashAnalyzer>, workers: usize) -> Self {
        Self {
            analyzer,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Analyse every job; outcomes come back in job order.
    pub async fn run(&self, jobs: Vec<ClipJob>) -> anyhow::Result<Vec<ClipOutcome>> {
        let mut handles = Vec::with_capacity(jobs.len());

        for job in jobs {
            let permit = self.semaphore.clone().acquire_owned().await?;
            let analyzer = Arc::clone(&self.analyzer);

            handles.push(tokio::task::spawn_blocking(move || {
                let result = job.request.and_then(|request| analyzer.analyze(&request));
                drop(permit);

                let outcome = match result {
                    Ok(result) => Outcome::Result(Box::new(result)),
                    Err(e) => {
                        tracing::error!(clip = %job.label, error = %e, "analysis failed");
                        Outcome::Failure(AnalysisFailure::from(&e))
                    }
                };
                ClipOutcome {
                    clip: job.label,
                    outcome,
                }
            }));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            outcomes.push(handle.await?);
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smash_analysis::synthetic::SmashClip;
    use smash_analysis::{AnalysisConfig, ReferenceProfile};
    use smash_core::{Error, ErrorKind};

    fn runner(workers: usize) -> BatchRunner {
        let analyzer = SmashAnalyzer::new(
            AnalysisConfig::default(),
            Arc::new(ReferenceProfile::elite_default()),
        )
        .unwrap();
        BatchRunner::new(Arc::new(analyzer), workers)
    }

    #[tokio::test]
    async fn test_batch_preserves_order_and_isolates_failures() {
        let jobs = vec![
            ClipJob {
                label: "swing".into(),
                request: Ok(SmashClip::default().request()),
            },
            ClipJob {
                label: "still".into(),
                request: Ok(SmashClip::still().request()),
            },
            ClipJob {
                label: "unreadable".into(),
                request: Err(Error::InputShape("cannot read unreadable.json".into())),
            },
        ];

        let outcomes = runner(2).run(jobs).await.unwrap();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].clip, "swing");

        match &outcomes[0].outcome {
            Outcome::Result(result) => assert_eq!(result.shot_segment.contact_frame, 78),
            other => panic!("expected result, got {:?}", other),
        }
        match &outcomes[1].outcome {
            Outcome::Failure(failure) => {
                assert_eq!(failure.kind, ErrorKind::Segmentation);
                assert!(failure.user_message.contains("Swing not detected"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(outcomes[2].is_failure());
    }

    #[tokio::test]
    async fn test_concurrent_runs_match_sequential() {
        let jobs = |n: usize| {
            (0..n)
                .map(|i| ClipJob {
                    label: format!("clip-{}", i),
                    request: Ok(SmashClip::default().request()),
                })
                .collect::<Vec<_>>()
        };

        let sequential = runner(1).run(jobs(4)).await.unwrap();
        let concurrent = runner(4).run(jobs(4)).await.unwrap();
        assert_eq!(sequential, concurrent);
    }

    #[test]
    fn test_failure_serialisation() {
        let outcome = ClipOutcome {
            clip: "a.json".into(),
            outcome: Outcome::Failure(AnalysisFailure::from(&Error::Segmentation(
                "no swing detected".into(),
            ))),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["clip"], "a.json");
        assert_eq!(json["failure"]["kind"], "segmentation");
    }
}
