use std::io::Cursor;
use worklogger::cli::commands::sync::{SyncOption, prompt_target};
use worklogger::core::sync::SyncTarget;
use worklogger::errors::AppError;

#[test]
fn test_menu_choices() {
    assert_eq!(SyncOption::from_choice("1"), Some(SyncOption::Existing));
    assert_eq!(SyncOption::from_choice(" 4\n"), Some(SyncOption::Cancel));
    assert_eq!(SyncOption::from_choice("0"), None);
    assert_eq!(SyncOption::from_choice("5"), None);
    assert_eq!(SyncOption::from_choice("two"), None);
}

#[test]
fn test_prompt_existing_session() {
    let mut input = Cursor::new("1\n7\n");
    let target = prompt_target(&mut input).expect("prompt");
    assert_eq!(target, Some(SyncTarget::Existing(7)));
}

#[test]
fn test_prompt_new_session() {
    let mut input = Cursor::new("2\nrelease prep\n");
    let target = prompt_target(&mut input).expect("prompt");
    assert_eq!(target, Some(SyncTarget::NewSession("release prep".into())));
}

#[test]
fn test_prompt_unassociated_and_cancel() {
    let mut input = Cursor::new("3\n");
    assert_eq!(
        prompt_target(&mut input).expect("prompt"),
        Some(SyncTarget::Unassociated)
    );

    let mut input = Cursor::new("4\n");
    assert_eq!(prompt_target(&mut input).expect("prompt"), None);
}

#[test]
fn test_prompt_rejects_bad_input() {
    let mut input = Cursor::new("9\n");
    assert!(matches!(
        prompt_target(&mut input),
        Err(AppError::InvalidInput(_))
    ));

    let mut input = Cursor::new("1\nabc\n");
    assert!(matches!(
        prompt_target(&mut input),
        Err(AppError::InvalidInput(_))
    ));

    // closed stdin
    let mut input = Cursor::new("");
    assert!(matches!(
        prompt_target(&mut input),
        Err(AppError::InvalidInput(_))
    ));
}
