use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::remote::RemoteBackend;
use crate::session::Session;

pub fn login<R: RemoteBackend>(remote: &mut R, email: &str, password: &str) -> Result<CmdResult> {
    let event = remote.sign_in(email, password)?;
    let mut result = CmdResult::default();
    let who = event.user.map(|u| u.email).unwrap_or_else(|| email.to_string());
    result.add_message(CmdMessage::success(format!("Signed in as {}", who)));
    Ok(result)
}

pub fn logout<R: RemoteBackend>(remote: &mut R, session: &Session) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if !session.is_signed_in() {
        result.add_message(CmdMessage::info("Not signed in."));
        return Ok(result);
    }
    remote.sign_out()?;
    result.add_message(CmdMessage::success("Signed out."));
    Ok(result)
}

pub fn whoami(session: &Session) -> Result<CmdResult> {
    let message = match &session.user {
        Some(user) => CmdMessage::info(format!("{} ({})", user.email, user.id)),
        None => CmdMessage::info("Not signed in."),
    };
    Ok(CmdResult::default().with_message(message))
}
