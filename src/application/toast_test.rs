use super::render;
use crate::domain::models::Notification;
use crate::domain::models::VoiceError;

#[test]
fn it_renders_a_title_only_notification() {
    let res = render(&Notification::success("Created from voice"));
    insta::assert_snapshot!(res, @"✔ Created from voice");
}

#[test]
fn it_renders_the_body_below_the_title() {
    let res = render(&Notification::from(&VoiceError::NoSpeechTimeout));
    insta::assert_snapshot!(res, @r###"
    ℹ No speech detected
      Please try speaking louder or closer to the microphone
    "###);
}

#[test]
fn it_drops_empty_bodies() {
    let res = render(&Notification::error("Create failed", Some("")));
    insta::assert_snapshot!(res, @"✖ Create failed");
}
