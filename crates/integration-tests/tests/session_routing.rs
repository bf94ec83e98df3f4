//! Role-routing tests for the session controller.
//!
//! Covers the role-to-area mapping through the full controller path, the
//! profile-lookup failure modes, and the navigation guards.

use schoolyard_core::{AreaToken, OrganizationId, Role, UserId};
use schoolyard_integration_tests::{TestContext, init_tracing, profile_for, session_for, settle};
use schoolyard_session::AuthChange;

async fn signed_in_context(role: Role, organization_id: Option<OrganizationId>) -> TestContext {
    let ctx = TestContext::new();
    let user = UserId::random();
    ctx.profiles.insert(profile_for(user, role, organization_id));
    ctx.controller.start().await;
    ctx.identity
        .emit(&AuthChange::SignedIn(session_for(user, "user@school.example")));
    settle(200).await;
    ctx
}

// =============================================================================
// Role mapping
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_teacher_lands_in_teacher_dashboard() {
    init_tracing();
    let ctx = signed_in_context(Role::Teacher, None).await;

    assert_eq!(ctx.navigator.calls(), vec![AreaToken::TeacherDashboard]);
    let snapshot = ctx.controller.snapshot();
    assert!(!snapshot.loading);
    assert_eq!(snapshot.role(), Some(Role::Teacher));
}

#[tokio::test(start_paused = true)]
async fn test_parent_and_student_land_in_their_dashboards() {
    init_tracing();
    let parent = signed_in_context(Role::Parent, None).await;
    assert_eq!(parent.navigator.calls(), vec![AreaToken::ParentDashboard]);

    let student = signed_in_context(Role::Student, None).await;
    assert_eq!(student.navigator.calls(), vec![AreaToken::StudentDashboard]);
}

#[tokio::test(start_paused = true)]
async fn test_management_without_organization_lands_in_setup() {
    init_tracing();
    let ctx = signed_in_context(Role::Management, None).await;

    assert_eq!(ctx.navigator.calls(), vec![AreaToken::ManagementSetup]);
}

#[tokio::test(start_paused = true)]
async fn test_management_with_organization_lands_in_dashboard() {
    init_tracing();
    let ctx = signed_in_context(Role::Management, Some(OrganizationId::random())).await;

    assert_eq!(ctx.navigator.calls(), vec![AreaToken::ManagementDashboard]);
}

#[tokio::test(start_paused = true)]
async fn test_unrecognized_role_routes_to_login() {
    init_tracing();
    let ctx = signed_in_context(Role::Unknown, None).await;

    assert_eq!(ctx.navigator.calls(), vec![AreaToken::Login]);
    assert!(!ctx.controller.snapshot().loading);
}

// =============================================================================
// Lookup failures
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_missing_profile_routes_to_login() {
    init_tracing();
    let ctx = TestContext::new();
    ctx.controller.start().await;
    // No profile record exists for this identity.
    ctx.identity.emit(&AuthChange::SignedIn(session_for(
        UserId::random(),
        "ghost@school.example",
    )));
    settle(200).await;

    assert_eq!(ctx.navigator.calls(), vec![AreaToken::Login]);
    let snapshot = ctx.controller.snapshot();
    assert!(!snapshot.loading);
    assert!(snapshot.profile.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_lookup_error_routes_to_login() {
    init_tracing();
    let ctx = TestContext::new();
    let user = UserId::random();
    ctx.profiles.insert(profile_for(user, Role::Teacher, None));
    ctx.profiles.set_fail(true);
    ctx.controller.start().await;
    ctx.identity
        .emit(&AuthChange::SignedIn(session_for(user, "teacher@school.example")));
    settle(200).await;

    assert_eq!(ctx.navigator.calls(), vec![AreaToken::Login]);
    assert!(!ctx.controller.snapshot().loading);
}

// =============================================================================
// Navigation guards
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_cooldown_releases_the_in_flight_guard() {
    init_tracing();
    let ctx = TestContext::new();
    let first = UserId::random();
    let second = UserId::random();
    ctx.profiles.insert(profile_for(first, Role::Teacher, None));
    ctx.profiles.insert(profile_for(second, Role::Parent, None));

    ctx.controller.start().await;
    ctx.identity
        .emit(&AuthChange::SignedIn(session_for(first, "one@school.example")));
    settle(200).await;
    assert!(ctx.controller.navigation_in_flight());

    // Past the cooldown the guard must be released so a legitimate later
    // transition is never permanently blocked.
    settle(4_000).await;
    assert!(!ctx.controller.navigation_in_flight());

    ctx.identity
        .emit(&AuthChange::SignedIn(session_for(second, "two@school.example")));
    settle(200).await;

    assert_eq!(
        ctx.navigator.calls(),
        vec![AreaToken::TeacherDashboard, AreaToken::ParentDashboard]
    );
}

#[tokio::test(start_paused = true)]
async fn test_sign_in_during_cooldown_skips_profile_fetch() {
    init_tracing();
    let ctx = TestContext::new();
    let first = UserId::random();
    let second = UserId::random();
    ctx.profiles.insert(profile_for(first, Role::Teacher, None));
    ctx.profiles.insert(profile_for(second, Role::Parent, None));

    ctx.controller.start().await;
    ctx.identity
        .emit(&AuthChange::SignedIn(session_for(first, "one@school.example")));
    settle(200).await;
    assert!(ctx.controller.navigation_in_flight());
    let lookups_before = ctx.profiles.lookup_count();

    // A second sign-in lands while the first transition is still in
    // flight: the in-flight transition owns resolution, so no second
    // lookup and no second navigation are issued.
    ctx.identity
        .emit(&AuthChange::SignedIn(session_for(second, "two@school.example")));
    settle(200).await;

    assert_eq!(ctx.profiles.lookup_count(), lookups_before);
    assert_eq!(ctx.navigator.calls(), vec![AreaToken::TeacherDashboard]);
}

#[tokio::test(start_paused = true)]
async fn test_navigator_failure_is_not_fatal() {
    init_tracing();
    let ctx = TestContext::new();
    let user = UserId::random();
    ctx.profiles.insert(profile_for(user, Role::Teacher, None));
    ctx.navigator.set_fail(true);

    ctx.controller.start().await;
    ctx.identity
        .emit(&AuthChange::SignedIn(session_for(user, "teacher@school.example")));
    settle(200).await;

    // The transition was rejected, but session and profile stay committed.
    let snapshot = ctx.controller.snapshot();
    assert!(!snapshot.loading);
    assert!(snapshot.is_authenticated());
    assert_eq!(snapshot.role(), Some(Role::Teacher));
}

// =============================================================================
// Non-sign-in stream events
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_token_refresh_updates_session_without_navigation() {
    init_tracing();
    let ctx = signed_in_context(Role::Teacher, None).await;
    let calls_before = ctx.navigator.calls();

    let user = ctx
        .controller
        .snapshot()
        .identity
        .map(|identity| identity.id)
        .expect("signed-in context has an identity");
    ctx.identity.emit(&AuthChange::TokenRefreshed(session_for(
        user,
        "teacher@school.example",
    )));
    settle(200).await;

    let snapshot = ctx.controller.snapshot();
    assert!(!snapshot.loading);
    assert!(snapshot.is_authenticated());
    assert_eq!(ctx.navigator.calls(), calls_before);
}

#[tokio::test(start_paused = true)]
async fn test_initial_session_replay_skips_duplicate_lookup() {
    init_tracing();
    let ctx = signed_in_context(Role::Teacher, None).await;
    let lookups_before = ctx.profiles.lookup_count();
    let calls_before = ctx.navigator.calls();

    let user = ctx
        .controller
        .snapshot()
        .identity
        .map(|identity| identity.id)
        .expect("signed-in context has an identity");
    ctx.identity.emit(&AuthChange::InitialSession(Some(session_for(
        user,
        "teacher@school.example",
    ))));
    settle(4_000).await;

    // The profile is already resolved for this identity; no second lookup,
    // no second navigation.
    assert_eq!(ctx.profiles.lookup_count(), lookups_before);
    assert_eq!(ctx.navigator.calls(), calls_before);
    assert!(!ctx.controller.snapshot().loading);
}

#[tokio::test(start_paused = true)]
async fn test_password_recovery_only_clears_loading() {
    init_tracing();
    let ctx = TestContext::new();
    ctx.controller.start().await;
    ctx.identity.emit(&AuthChange::PasswordRecovery);
    settle(100).await;

    assert!(!ctx.controller.snapshot().loading);
    assert!(ctx.navigator.calls().is_empty());
}
