//! Upload → analyze → chat lifecycle against the in-memory backend.

mod common;

use common::{clip, drive, reply, run, server_error, Call, FakeBackend};
use tokio::sync::mpsc::UnboundedReceiver;
use vidchat_core::{
    Analysis, ClientError, Controller, NoticeLevel, Rejection, StateChange, VideoPhase,
    VideoStatus,
};

fn notices(rx: &mut UnboundedReceiver<StateChange>) -> Vec<(NoticeLevel, String)> {
    let mut out = Vec::new();
    while let Ok(change) = rx.try_recv() {
        if let StateChange::Notice(notice) = change {
            out.push((notice.level, notice.text));
        }
    }
    out
}

#[tokio::test]
async fn upload_analyze_and_chat_with_session_continuity() {
    let backend = FakeBackend::new();
    let mut controller = Controller::new();
    let mut changes = controller.subscribe();

    let startup = controller.start();
    drive(&mut controller, &backend, startup).await;
    assert!(controller.catalog().is_empty());
    assert_eq!(controller.server_online(), Some(true));

    controller.select_file(clip(5)).unwrap();
    let upload = controller.upload().unwrap();
    assert!(controller.flags().uploading);

    backend.script_analysis(Ok(Analysis::text("a talk about gardening")));
    drive(&mut controller, &backend, vec![upload]).await;

    assert!(!controller.flags().uploading);
    assert!(!controller.flags().analyzing);
    assert!(controller.pending_file().is_none());
    assert_eq!(controller.catalog().len(), 1);
    let video = controller.catalog().videos()[0].clone();
    assert_eq!(video.filename, "clip.mp4");
    assert_eq!(video.size, 5 * 1024 * 1024);
    assert_eq!(video.status, VideoStatus::Analyzed);
    assert_eq!(video.analysis, Some(Analysis::text("a talk about gardening")));
    assert_eq!(backend.count(|c| matches!(c, Call::Analyze(_))), 1);

    let texts: Vec<_> = notices(&mut changes).into_iter().map(|(_, t)| t).collect();
    assert!(texts.contains(&"Video uploaded successfully!".to_string()));
    assert!(texts.contains(&"Video analyzed successfully!".to_string()));

    let history = controller.select_video(&video.id).unwrap().expect("history request");
    drive(&mut controller, &backend, vec![history]).await;
    assert!(!controller.session().is_history_loading());

    backend.script_reply(reply("It's about gardening", "s1"));
    let send = controller.send_message("What is this about?").unwrap();
    assert!(controller.flags().awaiting_reply);
    drive(&mut controller, &backend, vec![send]).await;

    assert_eq!(controller.session().session_id(), Some("s1"));
    assert_eq!(controller.session().turns().len(), 1);
    assert_eq!(controller.session().turns()[0].ai_response, "It's about gardening");
    assert_eq!(controller.session().draft(), "");

    backend.script_reply(reply("Soil, compost and seedlings.", "s1"));
    let send = controller.send_message("Summarize").unwrap();
    drive(&mut controller, &backend, vec![send]).await;

    let sent = backend.chat_calls();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].session_id, None);
    assert_eq!(sent[1].session_id.as_deref(), Some("s1"));
    assert_eq!(sent[1].message, "Summarize");
    assert_eq!(controller.session().turns().len(), 2);
}

#[tokio::test]
async fn failed_analysis_leaves_status_and_allows_retry() {
    let backend = FakeBackend::new();
    let id = backend.seed("talk.mp4", VideoStatus::Uploaded);
    let mut controller = Controller::new();
    let mut changes = controller.subscribe();
    let startup = controller.start();
    drive(&mut controller, &backend, startup).await;
    notices(&mut changes);

    backend.script_analysis(Err(server_error("model timeout")));
    let analyze = controller.analyze(&id).unwrap();
    assert_eq!(controller.phase(&id), Some(VideoPhase::Analyzing));
    drive(&mut controller, &backend, vec![analyze]).await;

    assert_eq!(controller.catalog().get(&id).unwrap().status, VideoStatus::Uploaded);
    assert_eq!(controller.phase(&id), Some(VideoPhase::Uploaded));
    assert!(!controller.flags().analyzing);
    assert_eq!(
        notices(&mut changes),
        vec![(NoticeLevel::Error, "Analysis failed: model timeout".to_string())]
    );

    let retry = controller.analyze(&id).unwrap();
    drive(&mut controller, &backend, vec![retry]).await;
    assert_eq!(controller.catalog().get(&id).unwrap().status, VideoStatus::Analyzed);
}

#[tokio::test]
async fn successful_analyses_never_regress_status() {
    let backend = FakeBackend::new();
    let id = backend.seed("talk.mp4", VideoStatus::Uploaded);
    let mut controller = Controller::new();
    let startup = controller.start();
    drive(&mut controller, &backend, startup).await;

    for round in 0..3 {
        backend.script_analysis(Ok(Analysis::text(format!("pass {round}"))));
        let analyze = controller.analyze(&id).unwrap();
        drive(&mut controller, &backend, vec![analyze]).await;
        assert_eq!(controller.catalog().get(&id).unwrap().status, VideoStatus::Analyzed);
    }

    // A list fetched before the analysis finished, applied after it, must not
    // roll the status back.
    let other = backend.seed("second.mp4", VideoStatus::Uploaded);
    let refresh = controller.refresh_catalog();
    drive(&mut controller, &backend, vec![refresh]).await;
    let early_refresh = controller.refresh_catalog();
    let stale_list = run(&backend, early_refresh).await;

    let analyze = controller.analyze(&other).unwrap();
    let done = run(&backend, analyze).await;
    let follow_ups = controller.apply(done);
    assert!(controller.apply(stale_list).is_empty());
    assert_eq!(controller.catalog().get(&other).unwrap().status, VideoStatus::Analyzed);

    drive(&mut controller, &backend, follow_ups).await;
    assert_eq!(controller.catalog().get(&other).unwrap().status, VideoStatus::Analyzed);
}

#[tokio::test]
async fn duplicate_analysis_is_rejected_locally() {
    let backend = FakeBackend::new();
    let id = backend.seed("talk.mp4", VideoStatus::Uploaded);
    let mut controller = Controller::new();
    let startup = controller.start();
    drive(&mut controller, &backend, startup).await;

    let first = controller.analyze(&id).unwrap();
    assert_eq!(
        controller.analyze(&id).unwrap_err(),
        ClientError::Rejected(Rejection::AnalysisInFlight(id.clone()))
    );
    drive(&mut controller, &backend, vec![first]).await;
    assert_eq!(backend.count(|c| matches!(c, Call::Analyze(_))), 1);
}

#[tokio::test]
async fn failed_upload_keeps_the_file_for_retry() {
    let backend = FakeBackend::new();
    let mut controller = Controller::new();
    let mut changes = controller.subscribe();

    controller.select_file(clip(1)).unwrap();
    backend.fail_next_upload(server_error("Only video files are allowed"));
    let upload = controller.upload().unwrap();
    drive(&mut controller, &backend, vec![upload]).await;

    assert!(!controller.flags().uploading);
    assert_eq!(controller.pending_file().map(|f| f.filename.as_str()), Some("clip.mp4"));
    assert!(controller.catalog().is_empty());
    assert_eq!(
        notices(&mut changes),
        vec![(NoticeLevel::Error, "Upload failed: Only video files are allowed".to_string())]
    );
    assert_eq!(backend.count(|c| matches!(c, Call::Analyze(_))), 0);

    let retry = controller.upload().unwrap();
    drive(&mut controller, &backend, vec![retry]).await;
    assert_eq!(controller.catalog().len(), 1);
    assert!(controller.pending_file().is_none());
}

#[tokio::test]
async fn chat_requires_an_analyzed_selection() {
    let backend = FakeBackend::new();
    let id = backend.seed("raw.mp4", VideoStatus::Uploaded);
    let mut controller = Controller::new();
    let startup = controller.start();
    drive(&mut controller, &backend, startup).await;

    assert!(matches!(controller.send_message("hi"), Err(ClientError::Validation(_))));
    let history = controller.select_video(&id).unwrap().unwrap();
    drive(&mut controller, &backend, vec![history]).await;
    assert!(matches!(controller.send_message("hi"), Err(ClientError::Validation(_))));
    assert!(backend.chat_calls().is_empty());
}

#[tokio::test]
async fn video_fetched_before_an_analysis_cannot_undo_it() {
    let backend = FakeBackend::new();
    let id = backend.seed("talk.mp4", VideoStatus::Uploaded);
    let mut controller = Controller::new();
    let startup = controller.start();
    drive(&mut controller, &backend, startup).await;
    let history = controller.select_video(&id).unwrap().unwrap();
    drive(&mut controller, &backend, vec![history]).await;

    let refresh = controller.refresh_selected().unwrap();
    let stale_fetch = run(&backend, refresh).await;

    let analyze = controller.analyze(&id).unwrap();
    let done = run(&backend, analyze).await;
    let follow_ups = controller.apply(done);
    assert!(controller.apply(stale_fetch).is_empty());

    assert_eq!(controller.catalog().get(&id).unwrap().status, VideoStatus::Analyzed);
    assert_eq!(controller.selected().unwrap().status, VideoStatus::Analyzed);
    assert!(controller.send_message("what happens?").is_ok());

    drive(&mut controller, &backend, follow_ups).await;
    assert_eq!(controller.catalog().get(&id).unwrap().status, VideoStatus::Analyzed);
}

#[tokio::test]
async fn failed_refresh_keeps_the_previous_list() {
    let backend = FakeBackend::new();
    let id = backend.seed("talk.mp4", VideoStatus::Analyzed);
    let mut controller = Controller::new();
    let mut changes = controller.subscribe();
    let startup = controller.start();
    drive(&mut controller, &backend, startup).await;
    notices(&mut changes);

    backend.seed("second.mp4", VideoStatus::Uploaded);
    backend.fail_next_list(server_error("database locked"));
    let refresh = controller.refresh_catalog();
    drive(&mut controller, &backend, vec![refresh]).await;

    assert_eq!(controller.catalog().len(), 1);
    assert!(controller.catalog().contains(&id));
    assert_eq!(
        notices(&mut changes),
        vec![(NoticeLevel::Warning, "Could not refresh videos: database locked".to_string())]
    );

    let retry = controller.refresh_catalog();
    drive(&mut controller, &backend, vec![retry]).await;
    assert_eq!(controller.catalog().len(), 2);
}

#[tokio::test]
async fn analysis_of_a_video_removed_by_a_newer_list_only_updates_the_selection() {
    let backend = FakeBackend::new();
    let id = backend.seed("talk.mp4", VideoStatus::Uploaded);
    let mut controller = Controller::new();
    let startup = controller.start();
    drive(&mut controller, &backend, startup).await;
    let history = controller.select_video(&id).unwrap().unwrap();
    drive(&mut controller, &backend, vec![history]).await;

    backend.script_analysis(Ok(Analysis::text("a cooking demo")));
    let analyze = controller.analyze(&id).unwrap();
    let done = run(&backend, analyze).await;

    backend.remove(&id);
    let refresh = controller.refresh_catalog();
    drive(&mut controller, &backend, vec![refresh]).await;
    assert!(!controller.catalog().contains(&id));

    let follow_ups = controller.apply(done);
    assert!(!controller.catalog().contains(&id));
    assert!(controller.catalog().is_empty());
    let selected = controller.selected().unwrap();
    assert_eq!(selected.id, id);
    assert_eq!(selected.status, VideoStatus::Analyzed);
    assert_eq!(selected.analysis, Some(Analysis::text("a cooking demo")));
    assert!(!controller.flags().analyzing);

    drive(&mut controller, &backend, follow_ups).await;
    assert!(controller.catalog().is_empty());
}
