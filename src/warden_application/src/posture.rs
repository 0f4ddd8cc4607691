use warden_core::SessionStore;

use crate::lockout::LockoutTracker;
use crate::session_manager::{SessionError, SessionManager};

/// Point-in-time inputs for a posture assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostureInput {
    pub active_sessions: usize,
    pub active_lockouts: usize,
    pub blocked_ips: usize,
    pub network_tier_online: bool,
    pub threat_tier_online: bool,
}

impl PostureInput {
    /// Gathers the live counts from the components; the tier flags come from
    /// whatever health checks the embedder runs upstream.
    pub async fn gather<S>(
        sessions: &SessionManager<S>,
        lockout: &LockoutTracker,
        network_tier_online: bool,
        threat_tier_online: bool,
    ) -> Result<Self, SessionError>
    where
        S: SessionStore,
    {
        Ok(Self {
            active_sessions: sessions.active_sessions().await?,
            active_lockouts: lockout.active_lockouts(),
            blocked_ips: lockout.blocked_count(),
            network_tier_online,
            threat_tier_online,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostureGrade {
    A,
    B,
    C,
    D,
    F,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostureReport {
    pub score: u8,
    pub grade: PostureGrade,
    /// One entry per deduction, in evaluation order.
    pub findings: Vec<String>,
}

/// Read-only health scoring. No state of its own: identical inputs always
/// produce the identical report.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityPostureAssessor;

impl SecurityPostureAssessor {
    pub fn assess(&self, input: &PostureInput) -> PostureReport {
        let mut score: i32 = 100;
        let mut findings = Vec::new();
        let mut deduct = |points: i32, finding: String| {
            score -= points;
            findings.push(finding);
        };

        if !input.network_tier_online {
            deduct(20, "network-access tier offline".to_string());
        }
        if !input.threat_tier_online {
            deduct(20, "threat-detection tier offline".to_string());
        }
        match input.blocked_ips {
            0 => {}
            1..=10 => deduct(5, format!("{} hard-blocked IPs", input.blocked_ips)),
            11..=25 => deduct(10, format!("{} hard-blocked IPs", input.blocked_ips)),
            _ => deduct(20, format!("{} hard-blocked IPs", input.blocked_ips)),
        }
        match input.active_lockouts {
            0 => {}
            1..=10 => deduct(5, format!("{} active lockouts", input.active_lockouts)),
            _ => deduct(15, format!("{} active lockouts", input.active_lockouts)),
        }
        if input.active_sessions > 10_000 {
            deduct(
                10,
                format!("{} active sessions (unusually large)", input.active_sessions),
            );
        }

        let score = score.clamp(0, 100) as u8;
        let grade = match score {
            90..=100 => PostureGrade::A,
            80..=89 => PostureGrade::B,
            70..=79 => PostureGrade::C,
            60..=69 => PostureGrade::D,
            _ => PostureGrade::F,
        };
        PostureReport {
            score,
            grade,
            findings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> PostureInput {
        PostureInput {
            active_sessions: 120,
            active_lockouts: 0,
            blocked_ips: 0,
            network_tier_online: true,
            threat_tier_online: true,
        }
    }

    #[test]
    fn healthy_inputs_grade_a() {
        let report = SecurityPostureAssessor.assess(&healthy());
        assert_eq!(report.score, 100);
        assert_eq!(report.grade, PostureGrade::A);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn missing_upstream_tiers_cost_the_most() {
        let report = SecurityPostureAssessor.assess(&PostureInput {
            network_tier_online: false,
            threat_tier_online: false,
            ..healthy()
        });
        assert_eq!(report.score, 60);
        assert_eq!(report.grade, PostureGrade::D);
        assert_eq!(report.findings.len(), 2);
    }

    #[test]
    fn block_and_lockout_volume_degrade_the_grade() {
        let report = SecurityPostureAssessor.assess(&PostureInput {
            blocked_ips: 30,
            active_lockouts: 12,
            ..healthy()
        });
        assert_eq!(report.score, 65);
        assert_eq!(report.grade, PostureGrade::D);
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let input = PostureInput {
            active_sessions: 11_000,
            active_lockouts: 3,
            blocked_ips: 2,
            network_tier_online: true,
            threat_tier_online: false,
        };
        let a = SecurityPostureAssessor.assess(&input);
        let b = SecurityPostureAssessor.assess(&input);
        assert_eq!(a, b);
        assert_eq!(a.score, 60);
    }

    #[tokio::test]
    async fn gather_reads_live_component_counts() {
        use crate::test_support::{CollectingSink, MemorySessionStore, manual_clock};
        use std::sync::Arc;
        use warden_core::{PrincipalId, SecurityConfig};

        let config = Arc::new(SecurityConfig::default());
        let clock = manual_clock();
        let lockout = LockoutTracker::new(
            config.clone(),
            clock.clone(),
            Arc::new(CollectingSink::default()),
        );
        let sessions = SessionManager::new(MemorySessionStore::default(), config, clock);
        sessions
            .create_session(PrincipalId::new("user-1").unwrap(), "10.0.0.5")
            .await
            .unwrap();
        lockout.block("203.0.113.9", "abuse");

        let input = PostureInput::gather(&sessions, &lockout, true, true)
            .await
            .unwrap();
        assert_eq!(input.active_sessions, 1);
        assert_eq!(input.blocked_ips, 1);
        assert_eq!(input.active_lockouts, 0);
    }
}
