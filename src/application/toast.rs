#[cfg(test)]
#[path = "toast_test.rs"]
mod tests;

use yansi::Paint;

use crate::domain::models::Notification;
use crate::domain::models::NotificationKind;

pub fn render(notification: &Notification) -> String {
    let icon = match notification.kind {
        NotificationKind::Success => "✔",
        NotificationKind::Error => "✖",
        NotificationKind::Info => "ℹ",
    };

    let mut res = format!("{icon} {}", notification.title);
    if let Some(body) = &notification.body {
        res = format!("{res}\n  {body}");
    }

    return res;
}

pub fn show(notification: &Notification) {
    let text = render(notification);
    match notification.kind {
        NotificationKind::Success => println!("{}", Paint::green(text)),
        NotificationKind::Info => println!("{}", Paint::cyan(text)),
        NotificationKind::Error => eprintln!("{}", Paint::red(text)),
    }
}
