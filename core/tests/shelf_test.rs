use std::fs;
use std::path::Path;

use mdshelf_core::view::{FetchRequest, FetchTarget, Selection};
use mdshelf_core::{Config, ContentRoot, ErrorKind, ViewEvent, ViewState};

fn write(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

/// Answer a view request straight from the content root.
fn answer(root: &ContentRoot, request: &FetchRequest) -> ViewEvent {
    let token = request.token;
    let result = match &request.target {
        FetchTarget::Folders => {
            root.list_folders().map(|folders| ViewEvent::FoldersLoaded { token, folders })
        }
        FetchTarget::Files { folder } => {
            root.list_files(folder).map(|files| ViewEvent::FilesLoaded { token, files })
        }
        FetchTarget::Content { folder, file } => root
            .read_content(folder, file)
            .map(|content| ViewEvent::ContentLoaded { token, content }),
    };
    result.unwrap_or_else(|err| ViewEvent::FetchFailed { token, error: err.to_string() })
}

#[test]
fn config_file_drives_content_root_and_display() {
    let temp = tempfile::tempdir().unwrap();
    let content = temp.path().join("content");
    write(&content.join("Drafts/2024-05-01-12:00:00.md"), "# draft");
    write(&content.join("Papers/2024-04-01-09:00:00.md"), "# paper");

    let config_path = temp.path().join("config.toml");
    let toml = format!(
        r##"
[content]
root = "{}"
excluded_folders = ["Drafts"]

[[display.rules]]
contains = "Paper"
icon = "book"
color = "#123456"
"##,
        content.display()
    );
    fs::write(&config_path, toml).unwrap();

    let config = Config::load(Some(&config_path)).unwrap();
    let root = config.content.content_root();

    let names: Vec<String> =
        root.list_folders().unwrap().into_iter().map(|folder| folder.name).collect();
    assert_eq!(names, vec!["Papers"]);
    assert_eq!(root.list_files("Drafts").unwrap_err().kind(), ErrorKind::Forbidden);
    assert_eq!(config.display.appearance_for("Papers").icon, "book");
}

#[test]
fn unknown_config_keys_are_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "[content]\nrooot = \"typo\"\n").unwrap();

    let err = Config::load(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("invalid config"), "{err}");
}

#[test]
fn browsing_session_against_a_content_root() {
    let temp = tempfile::tempdir().unwrap();
    write(&temp.path().join("News/2024-03-05-09:00:00.md"), "# March\n\n![c](chart.png)");
    write(&temp.path().join("News/2023-01-01-00:00:00.md"), "# Old");
    write(&temp.path().join("Notes/notes.md"), "plain");
    let root = ContentRoot::new(temp.path());

    let mut step = ViewState::start();
    let mut state = loop {
        match step.requests.pop() {
            Some(request) => step = step.state.apply(answer(&root, &request)),
            None => break step.state,
        }
    };
    assert_eq!(state.folders().len(), 2);

    step = state.apply(ViewEvent::SelectFolder("News".to_string()));
    state = loop {
        match step.requests.pop() {
            Some(request) => step = step.state.apply(answer(&root, &request)),
            None => break step.state,
        }
    };

    assert_eq!(state.current_file(), Some("2024-03-05-09:00:00.md"));
    let html = state.rendered_html().unwrap();
    assert!(html.contains(r#"src="News/chart.png""#), "{html}");

    let state = state.apply(ViewEvent::Search("2023".to_string())).state;
    assert_eq!(state.visible_files(), vec!["2023-01-01-00:00:00.md"]);
    assert!(matches!(state.selection(), Selection::File { content, .. } if !content.is_loading()));
}
