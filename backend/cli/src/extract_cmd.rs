//! `textsnap extract`: run one image through the session controller.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};

use textsnap_client::{
    ControllerEvent, ControllerSettings, HttpTransport, NotificationId, SessionController,
    SubmitOutcome,
};
use textsnap_config::ClientConfig;

use crate::terminal_output::print_notification;

/// Returns `true` when text was extracted (possibly none).
pub async fn run(image: &Path, gateway_url: &str, client: &ClientConfig) -> Result<bool> {
    let transport = Arc::new(HttpTransport::new(gateway_url));
    let mut controller = SessionController::new(transport, ControllerSettings::from_config(client));
    let mut printed = None;

    let outcome = controller.submit_picked_file(image).await;
    print_new_notifications(&controller, &mut printed);
    if !matches!(outcome, SubmitOutcome::Dispatched(_)) {
        return Ok(false);
    }

    loop {
        match controller.next_event().await {
            ControllerEvent::ResponseApplied { result, .. } => {
                print_new_notifications(&controller, &mut printed);
                if let Some(text) = result.text().filter(|t| !t.is_empty()) {
                    println!("\n{text}");
                }
                return Ok(result.is_success());
            }
            ControllerEvent::ResponseDiscarded { .. } | ControllerEvent::NotificationsExpired(_) => {}
            ControllerEvent::Idle => bail!("extraction request was lost before it completed"),
        }
    }
}

/// Print notifications that appeared since the last call.
fn print_new_notifications(controller: &SessionController, printed: &mut Option<NotificationId>) {
    for notification in controller.state().notifications() {
        if printed.is_some_and(|last| notification.id <= last) {
            continue;
        }
        print_notification(notification);
        *printed = Some(notification.id);
    }
}
