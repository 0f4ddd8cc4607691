//! End-to-end scenarios through the facade: both authentication paths, the
//! lockout window, sliding session expiry, and the event queue.

use std::sync::Arc;

use warden::core::chrono_span;
use warden::ports::NoopEventSink;
use warden::Clock;
use warden::{
    AuthOutcome, ChannelEventSink, ChannelKind, CredentialAuthenticator, FailureReason,
    FieldEncryptionService, InMemoryCredentialStore, InMemorySessionStore, LockReason,
    LockoutTracker, ManualClock, MockDeliveryChannel, OtpChannelGateway, Password,
    PasswordPolicyEngine, PostureInput, PrincipalId, Secret, SecurityConfig, SecurityEventSink,
    SecurityPostureAssessor, SessionManager, SessionValidation,
};

struct Stack {
    clock: Arc<ManualClock>,
    config: Arc<SecurityConfig>,
    lockout: Arc<LockoutTracker>,
    sessions: Arc<SessionManager<InMemorySessionStore>>,
    gateway: Arc<OtpChannelGateway<InMemorySessionStore>>,
    authenticator: CredentialAuthenticator<InMemoryCredentialStore, InMemorySessionStore>,
    channel: MockDeliveryChannel,
}

fn password(raw: &str) -> Password {
    Password::try_from(Secret::from(raw.to_string())).unwrap()
}

fn principal() -> PrincipalId {
    PrincipalId::new("user-1").unwrap()
}

async fn stack(mfa_enabled: bool, events: Arc<dyn SecurityEventSink>) -> Stack {
    let config = Arc::new(SecurityConfig::default());
    let clock = Arc::new(ManualClock::starting_at(chrono::Utc::now()));
    let lockout = Arc::new(LockoutTracker::new(
        config.clone(),
        clock.clone(),
        events.clone(),
    ));
    let sessions = Arc::new(SessionManager::new(
        InMemorySessionStore::new(),
        config.clone(),
        clock.clone(),
    ));
    let channel = MockDeliveryChannel::new();
    let gateway = Arc::new(OtpChannelGateway::new(
        Arc::new(channel.clone()),
        lockout.clone(),
        sessions.clone(),
        events.clone(),
        config.clone(),
        clock.clone(),
    ));

    let credentials = InMemoryCredentialStore::new();
    credentials
        .upsert(principal(), password("Str0ng!Passw0rd"), mfa_enabled)
        .await
        .unwrap();

    let authenticator = CredentialAuthenticator::new(
        credentials,
        lockout.clone(),
        sessions.clone(),
        PasswordPolicyEngine::default(),
        events,
        clock.clone(),
    )
    .with_second_factor(gateway.clone());

    Stack {
        clock,
        config,
        lockout,
        sessions,
        gateway,
        authenticator,
        channel,
    }
}

#[tokio::test]
async fn lockout_window_opens_and_closes() {
    let s = stack(false, Arc::new(NoopEventSink)).await;

    for _ in 0..5 {
        let outcome = s
            .authenticator
            .authenticate(&principal(), &password("Wrong-Password-0!"), "10.0.0.5", None)
            .await
            .unwrap();
        assert!(matches!(outcome, AuthOutcome::Failure { .. }));
    }

    // Sixth attempt is refused even with the correct credential.
    let outcome = s
        .authenticator
        .authenticate(&principal(), &password("Str0ng!Passw0rd"), "10.0.0.5", None)
        .await
        .unwrap();
    assert_eq!(
        outcome,
        AuthOutcome::Locked {
            reason: LockReason::AccountLocked
        }
    );

    // Once the lockout duration elapses, evaluation returns to normal.
    s.clock.advance(chrono::Duration::minutes(16));
    let outcome = s
        .authenticator
        .authenticate(&principal(), &password("Str0ng!Passw0rd"), "10.0.0.5", None)
        .await
        .unwrap();
    let AuthOutcome::Success { session } = outcome else {
        panic!("expected success after the lockout window");
    };
    assert_eq!(
        session.expires_at,
        s.clock.now() + chrono_span(s.config.session_timeout)
    );
}

#[tokio::test]
async fn otp_round_trip_converges_on_the_same_session_type() {
    let s = stack(false, Arc::new(NoopEventSink)).await;

    let issue = s
        .gateway
        .initiate(principal(), ChannelKind::Email, "user@example.com")
        .await
        .unwrap();
    assert_eq!(issue.masked_destination, "us***@example.com");

    let code = s.channel.last_code().await.unwrap();
    let outcome = s
        .gateway
        .verify(&issue.challenge_id, &code, "10.0.0.5")
        .await
        .unwrap();
    let AuthOutcome::Success { session } = outcome else {
        panic!("expected an OTP session");
    };

    // The session is the ordinary kind: validation slides it like any other.
    let validation = s.sessions.validate_session(&session.id).await.unwrap();
    assert!(validation.is_valid());
}

#[tokio::test]
async fn expired_codes_are_dead_even_when_correct() {
    let s = stack(false, Arc::new(NoopEventSink)).await;
    let issue = s
        .gateway
        .initiate(principal(), ChannelKind::Sms, "+15551234567")
        .await
        .unwrap();
    let code = s.channel.last_code().await.unwrap();

    s.clock.advance(chrono::Duration::minutes(6));
    let outcome = s
        .gateway
        .verify(&issue.challenge_id, &code, "10.0.0.5")
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        AuthOutcome::Failure {
            reason: FailureReason::OtpExpired,
            ..
        }
    ));
}

#[tokio::test]
async fn sessions_slide_then_expire_idle() {
    let s = stack(false, Arc::new(NoopEventSink)).await;
    let outcome = s
        .authenticator
        .authenticate(&principal(), &password("Str0ng!Passw0rd"), "10.0.0.5", None)
        .await
        .unwrap();
    let AuthOutcome::Success { session } = outcome else {
        panic!("expected success");
    };

    for _ in 0..3 {
        s.clock.advance(chrono::Duration::minutes(40));
        assert!(
            s.sessions
                .validate_session(&session.id)
                .await
                .unwrap()
                .is_valid()
        );
    }

    // Idle past the timeout: expired, evicted, then unknown.
    s.clock.advance(chrono::Duration::minutes(61));
    assert_eq!(
        s.sessions.validate_session(&session.id).await.unwrap(),
        SessionValidation::Expired
    );
    assert_eq!(
        s.sessions.validate_session(&session.id).await.unwrap(),
        SessionValidation::NotFound
    );
}

#[tokio::test]
async fn sweep_evicts_abandoned_sessions() {
    let s = stack(false, Arc::new(NoopEventSink)).await;
    s.authenticator
        .authenticate(&principal(), &password("Str0ng!Passw0rd"), "10.0.0.5", None)
        .await
        .unwrap();
    assert_eq!(s.sessions.active_sessions().await.unwrap(), 1);

    s.clock.advance(chrono::Duration::minutes(61));
    assert_eq!(s.sessions.sweep_expired().await.unwrap(), 1);
    assert_eq!(s.sessions.active_sessions().await.unwrap(), 0);
}

#[tokio::test]
async fn mfa_principals_complete_login_through_the_gateway() {
    let s = stack(true, Arc::new(NoopEventSink)).await;

    let outcome = s
        .authenticator
        .authenticate(&principal(), &password("Str0ng!Passw0rd"), "10.0.0.5", None)
        .await
        .unwrap();
    assert!(matches!(outcome, AuthOutcome::MfaRequired { .. }));

    s.gateway
        .initiate(principal(), ChannelKind::Email, "user@example.com")
        .await
        .unwrap();
    let code = s.channel.last_code().await.unwrap();

    let outcome = s
        .authenticator
        .authenticate(
            &principal(),
            &password("Str0ng!Passw0rd"),
            "10.0.0.5",
            Some(&code),
        )
        .await
        .unwrap();
    assert!(outcome.is_success());
}

#[tokio::test]
async fn security_events_drain_in_emit_order() {
    let (sink, mut rx) = ChannelEventSink::unbounded();
    let s = stack(false, Arc::new(sink)).await;

    s.authenticator
        .authenticate(&principal(), &password("Wrong-Password-0!"), "10.0.0.5", None)
        .await
        .unwrap();
    s.authenticator
        .authenticate(&principal(), &password("Str0ng!Passw0rd"), "10.0.0.5", None)
        .await
        .unwrap();

    assert_eq!(rx.recv().await.unwrap().name(), "auth.failure");
    assert_eq!(rx.recv().await.unwrap().name(), "auth.success");
}

#[tokio::test]
async fn posture_reflects_live_lockout_state() {
    let s = stack(false, Arc::new(NoopEventSink)).await;
    s.lockout.block("203.0.113.9", "abuse");
    s.lockout.block("203.0.113.10", "abuse");

    let input = PostureInput::gather(&s.sessions, &s.lockout, true, true)
        .await
        .unwrap();
    let report = SecurityPostureAssessor.assess(&input);
    assert_eq!(input.blocked_ips, 2);
    assert!(report.score < 100);
}

#[tokio::test]
async fn field_encryption_round_trips_structured_values() {
    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct RecoveryProfile {
        email: String,
        phone: String,
    }

    let service = FieldEncryptionService::new(&[9u8; 32]).unwrap();
    let profile = RecoveryProfile {
        email: "user@example.com".to_string(),
        phone: "+15551234567".to_string(),
    };

    let sealed = service.encrypt(&profile).unwrap();
    let restored: RecoveryProfile = service.decrypt(&sealed).unwrap();
    assert_eq!(restored, profile);

    let mut tampered = sealed;
    tampered.ciphertext[0] ^= 0x01;
    assert!(service.decrypt::<RecoveryProfile>(&tampered).is_err());
}
