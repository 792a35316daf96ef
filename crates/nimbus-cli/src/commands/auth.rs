//! Sign-in, registration and account commands.

use clap::Args;
use dialoguer::{Input, Password};

use nimbus_core::error::AppError;
use nimbus_entity::{LoginRequest, RegisterRequest};
use nimbus_service::Services;

use crate::commands::resolve::{self, Passphrase};
use crate::output::{self, OutputFormat};

/// Arguments for `login`
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted if omitted)
    #[arg(short, long)]
    pub email: Option<String>,
    /// Account password (prompted if omitted)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Arguments for `register`
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,
    /// First name
    #[arg(long)]
    pub first_name: String,
    /// Last name
    #[arg(long)]
    pub last_name: String,
}

/// Sign in, prompting for anything not given on the command line.
pub async fn login(args: &LoginArgs, services: &Services) -> Result<(), AppError> {
    let email = match &args.email {
        Some(email) => email.clone(),
        None => Input::<String>::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
    };
    let password = match &args.password {
        Some(password) => password.clone(),
        None => Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
    };

    let session = services
        .auth
        .login(LoginRequest::new(email, password))
        .await?;
    output::print_success(&format!("Signed in as {}", session.user.display_name()));
    Ok(())
}

/// Create an account; the password is always prompted twice.
pub async fn register(args: &RegisterArgs, services: &Services) -> Result<(), AppError> {
    let password = Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))?;
    let confirm = Password::new()
        .with_prompt("Confirm password")
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

    let request = RegisterRequest {
        email: args.email.clone(),
        password,
        first_name: args.first_name.clone(),
        last_name: args.last_name.clone(),
    };
    let session = services.auth.register(request, &confirm).await?;
    output::print_success(&format!(
        "Account created, signed in as {}",
        session.user.display_name()
    ));
    Ok(())
}

pub async fn logout(services: &Services) -> Result<(), AppError> {
    services.auth.logout().await?;
    output::print_success("Signed out");
    Ok(())
}

pub async fn whoami(services: &Services, format: OutputFormat) -> Result<(), AppError> {
    let user = services.auth.me().await?;
    match format {
        OutputFormat::Json => output::print_item(&user, format),
        OutputFormat::Table => {
            output::print_kv("Name", &user.display_name());
            output::print_kv("Email", &user.email);
            output::print_kv("User ID", user.id.as_str());
        }
    }
    Ok(())
}

/// Account usage plus a per-type breakdown of the folder at `path`.
///
/// Without a path the shell reports on the folder it is in; one-shot runs
/// report on the root.
pub async fn usage(
    path: Option<&str>,
    services: &Services,
    from_root: bool,
    passphrase: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    if from_root || path.is_some() {
        let path = path.unwrap_or("/");
        resolve::walk(services, path, from_root, Passphrase::from(passphrase)).await?;
    }
    let usage = services.storage.usage().await?;
    let breakdown = services.storage.breakdown().await;
    output::print_usage(&usage, &breakdown, format);
    Ok(())
}
