use super::*;
use crate::identity::MemoryIdentity;
use crate::identity::memory::Operation;
use crate::principal::Principal;

fn alice() -> Principal {
    Principal { id: "u1".into(), name: "A".into(), email: "a@b.com".into() }
}

async fn ready_shell(identity: MemoryIdentity) -> (Shell, Arc<MemoryIdentity>) {
    let identity = Arc::new(identity);
    let store = Arc::new(SessionStore::new(identity.clone()));
    store.initialize().await;
    let mut shell = Shell::new(store);
    shell.wait_ready().await;
    (shell, identity)
}

// =============================================================================
// parse_command
// =============================================================================

#[test]
fn parse_login() {
    assert_eq!(parse_command("login a@b.com pw"), Ok(Command::Login("a@b.com".into(), "pw".into())));
}

#[test]
fn parse_login_missing_password() {
    assert_eq!(parse_command("login a@b.com"), Err(ShellError::Usage("login <email> <password>")));
}

#[test]
fn parse_register() {
    assert_eq!(
        parse_command("  register A a@b.com pw pw2 "),
        Ok(Command::Register {
            name: "A".into(),
            email: "a@b.com".into(),
            password: "pw".into(),
            password_confirm: "pw2".into(),
        })
    );
}

#[test]
fn parse_simple_verbs() {
    assert_eq!(parse_command("logout"), Ok(Command::Logout));
    assert_eq!(parse_command("whoami"), Ok(Command::Whoami));
    assert_eq!(parse_command("help"), Ok(Command::Help));
    assert_eq!(parse_command("quit"), Ok(Command::Quit));
    assert_eq!(parse_command("exit"), Ok(Command::Quit));
    assert_eq!(parse_command("goto /profile"), Ok(Command::Goto("/profile".into())));
}

#[test]
fn parse_blank_and_unknown() {
    assert_eq!(parse_command("   "), Err(ShellError::Empty));
    assert_eq!(parse_command("dance"), Err(ShellError::Unknown("dance".into())));
}

// =============================================================================
// navigation
// =============================================================================

#[tokio::test]
async fn signed_out_start_lands_on_login() {
    let (shell, _) = ready_shell(MemoryIdentity::new()).await;
    assert_eq!(shell.location(), Route::Login);
    let screen = shell.render();
    assert!(screen.contains("[Login]"));
    assert!(screen.contains("---- /login ----"));
}

#[tokio::test]
async fn restored_session_lands_home() {
    let (shell, _) = ready_shell(MemoryIdentity::new().with_active_session(alice(), "pw")).await;
    assert_eq!(shell.location(), Route::Home);
    let screen = shell.render();
    assert!(screen.contains("Home | Profile | [Logout]"));
    assert!(screen.contains("Welcome, A."));
}

#[tokio::test]
async fn render_before_initialize_shows_placeholder() {
    let store = Arc::new(SessionStore::new(Arc::new(MemoryIdentity::new())));
    let shell = Shell::new(store);
    assert!(shell.render().ends_with("Loading..."));
    assert_eq!(shell.location(), Route::Home);
}

#[tokio::test]
async fn render_while_loading_hides_header() {
    let store = Arc::new(SessionStore::new(Arc::new(MemoryIdentity::new())));
    let shell = Shell::new(store);
    let screen = shell.render();
    assert_eq!(screen, "Loading...");
    assert!(!screen.contains("[Login]"));
    assert!(!screen.contains("LOGO"));
}

#[tokio::test]
async fn goto_protected_while_signed_out_redirects() {
    let (mut shell, _) = ready_shell(MemoryIdentity::new()).await;
    shell.execute(Command::Goto("/profile".into())).await;
    assert_eq!(shell.location(), Route::Login);
}

#[tokio::test]
async fn goto_unknown_path() {
    let (mut shell, _) = ready_shell(MemoryIdentity::new()).await;
    let flow = shell.execute(Command::Goto("/nowhere".into())).await;
    assert_eq!(flow, Flow::Continue(Some("page not found: /nowhere".into())));
    assert_eq!(shell.location(), Route::Login);
}

// =============================================================================
// form commands
// =============================================================================

#[tokio::test]
async fn login_navigates_home_and_profile_renders() {
    let (mut shell, _) = ready_shell(MemoryIdentity::new().with_account(alice(), "pw")).await;

    let flow = shell.execute(Command::Login("a@b.com".into(), "pw".into())).await;
    assert_eq!(flow, Flow::Continue(Some("signed in as A".into())));
    assert_eq!(shell.location(), Route::Home);

    shell.execute(Command::Goto("/profile".into())).await;
    assert_eq!(shell.location(), Route::Profile);
    assert!(shell.render().contains("Email: a@b.com"));
}

#[tokio::test]
async fn failed_login_stays_on_login() {
    let (mut shell, _) = ready_shell(MemoryIdentity::new().with_account(alice(), "pw")).await;
    let flow = shell.execute(Command::Login("a@b.com".into(), "bad".into())).await;
    assert_eq!(flow, Flow::Continue(Some("login failed: invalid credentials".into())));
    assert_eq!(shell.location(), Route::Login);
}

#[tokio::test]
async fn register_mismatch_reports_and_skips_remote() {
    let (mut shell, identity) = ready_shell(MemoryIdentity::new()).await;
    shell.execute(Command::Goto("/register".into())).await;

    let flow = shell
        .execute(Command::Register {
            name: "A".into(),
            email: "a@b.com".into(),
            password: "pw".into(),
            password_confirm: "pw2".into(),
        })
        .await;

    assert_eq!(flow, Flow::Continue(Some("passwords did not match".into())));
    assert_eq!(shell.location(), Route::Register);
    assert_eq!(identity.calls(), vec![Operation::GetAccount]);
}

#[tokio::test]
async fn register_success_goes_home() {
    let (mut shell, _) = ready_shell(MemoryIdentity::new()).await;
    let flow = shell
        .execute(Command::Register {
            name: "A".into(),
            email: "a@b.com".into(),
            password: "password1".into(),
            password_confirm: "password1".into(),
        })
        .await;
    assert_eq!(flow, Flow::Continue(Some("signed in as A".into())));
    assert_eq!(shell.location(), Route::Home);
}

#[tokio::test]
async fn logout_returns_to_login() {
    let (mut shell, _) = ready_shell(MemoryIdentity::new().with_active_session(alice(), "pw")).await;
    let flow = shell.execute(Command::Logout).await;
    assert_eq!(flow, Flow::Continue(Some("signed out".into())));
    assert_eq!(shell.location(), Route::Login);
    assert!(shell.render().contains("[Login]"));
}

#[tokio::test]
async fn whoami_and_quit() {
    let (mut shell, _) = ready_shell(MemoryIdentity::new().with_active_session(alice(), "pw")).await;
    assert_eq!(shell.execute(Command::Whoami).await, Flow::Continue(Some("A <a@b.com> (u1)".into())));
    assert_eq!(shell.execute(Command::Quit).await, Flow::Quit);
}

#[tokio::test]
async fn form_commands_refused_while_loading() {
    let identity = Arc::new(MemoryIdentity::new().with_account(alice(), "pw"));
    let store = Arc::new(SessionStore::new(identity.clone()));
    let mut shell = Shell::new(store);

    let flow = shell.execute(Command::Login("a@b.com".into(), "pw".into())).await;

    assert_eq!(flow, Flow::Continue(Some("still working on the previous request".into())));
    assert!(identity.calls().is_empty());
}
