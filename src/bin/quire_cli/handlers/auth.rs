#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use quire::infra::http::AvatarUpload;
use quire::infra::token;
use quire_api_types::{LoginRequest, ProfileUpdateRequest, RegisterRequest};
use serde_json::json;

use crate::args::AuthCmd;
use crate::client::{CliError, Ctx, OpContext};
use crate::io::read_opt_value;
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: AuthCmd) -> Result<(), CliError> {
    match cmd {
        AuthCmd::Login {
            username,
            password,
            save_token,
        } => login(ctx, username, password, save_token).await,
        AuthCmd::Register {
            username,
            password,
            email,
            captcha_id,
            captcha_code,
        } => {
            let request = RegisterRequest {
                username,
                email,
                password,
                captcha_id,
                captcha_code,
            };
            let profile = ctx.client.register(&request).await.op("auth.register")?;
            print_json(&profile)
        }
        AuthCmd::Captcha => print_json(&ctx.client.captcha().await.op("auth.captcha")?),
        AuthCmd::Logout => {
            ctx.client.logout().await.op("auth.logout")?;
            println!("logged out");
            Ok(())
        }
        AuthCmd::Profile => print_json(&ctx.client.profile().await.op("auth.profile")?),
        AuthCmd::UpdateProfile {
            nickname,
            email,
            bio,
            bio_file,
        } => {
            let request = ProfileUpdateRequest {
                nickname,
                email,
                bio: read_opt_value(bio, bio_file)?,
            };
            let profile = ctx
                .client
                .update_profile(&request)
                .await
                .op("auth.update_profile")?;
            print_json(&profile)
        }
        AuthCmd::Avatar { path } => {
            let upload = AvatarUpload::from_path(&path).await.op("auth.avatar")?;
            let profile = ctx.client.upload_avatar(upload).await.op("auth.avatar")?;
            print_json(&profile)
        }
    }
}

async fn login(
    ctx: &Ctx,
    username: String,
    password: String,
    save_token: Option<PathBuf>,
) -> Result<(), CliError> {
    let request = LoginRequest {
        username,
        password,
        captcha_id: None,
        captcha_code: None,
    };
    let issued = ctx.client.login(&request).await.op("auth.login")?;
    if let Some(path) = save_token {
        token::save(&path, &issued.access_token).await?;
        print_json(&json!({ "token_type": issued.token_type, "saved_to": path }))
    } else {
        print_json(&issued)
    }
}
