use crate::commands::{extract, rebuild, strip};
use crate::commands::{CmdMessage, CmdResult, LocaleReport, LocaleStatus};
use crate::config::MergeConfig;
use crate::error::{MergeError, Result};
use crate::model::Document;
use crate::store::ResourceStore;
use std::io;
use std::path::Path;
use tracing::{debug, debug_span};

/// Merges every locale directory of `source` into `dest`.
///
/// Locales are handled one at a time in name order. A missing or unreadable
/// file, or a destination that cannot be spliced, only affects its own
/// locale. Listing the tree or writing a file aborts the whole run on error.
pub fn run<S: ResourceStore, D: ResourceStore>(
    source: &S,
    dest: &mut D,
    config: &MergeConfig,
    dry_run: bool,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let locales = source.list_locales(&config.locale_prefix)?;
    debug!(count = locales.len(), "found locale directories");

    for locale in &locales {
        let _span = debug_span!("locale", %locale).entered();
        let report = merge_locale(source, dest, config, locale, dry_run, &mut result)?;
        result.add_report(report);
    }

    result.add_message(summary(&result, dry_run));
    Ok(result)
}

fn merge_locale<S: ResourceStore, D: ResourceStore>(
    source: &S,
    dest: &mut D,
    config: &MergeConfig,
    locale: &str,
    dry_run: bool,
    result: &mut CmdResult,
) -> Result<LocaleReport> {
    let file = config.strings_file.as_str();
    let report = |status, entries| LocaleReport {
        locale: locale.to_string(),
        status,
        entries,
    };

    if !source.exists(locale, file) {
        result.add_message(CmdMessage::warning(format!(
            "Skipping {}: source {} not found",
            locale,
            source.path_of(locale, file).display()
        )));
        return Ok(report(LocaleStatus::Skipped, 0));
    }
    if !dest.exists(locale, file) {
        result.add_message(CmdMessage::warning(format!(
            "Skipping {}: destination {} not found",
            locale,
            dest.path_of(locale, file).display()
        )));
        return Ok(report(LocaleStatus::Skipped, 0));
    }

    let source_text = match source.read(locale, file) {
        Ok(text) => text,
        Err(MergeError::Io(e)) => {
            return Ok(unreadable(locale, &source.path_of(locale, file), &e, result))
        }
        Err(e) => return Err(e),
    };
    let extraction = extract::run(&Document::parse(&source_text), config);
    for id in &extraction.unterminated {
        result.add_message(CmdMessage::warning(format!(
            "{}: entry {} in {} is never closed, left out",
            locale,
            id,
            source.path_of(locale, file).display()
        )));
    }

    let current = match dest.read(locale, file) {
        Ok(text) => text,
        Err(MergeError::Io(e)) => {
            return Ok(unreadable(locale, &dest.path_of(locale, file), &e, result))
        }
        Err(e) => return Err(e),
    };
    let rebuilt = match strip::run(&Document::parse(&current))
        .and_then(|stripped| rebuild::run(&stripped, &extraction.table, &config.identifiers))
    {
        Ok(doc) => doc,
        Err(MergeError::Malformed(reason)) => {
            result.add_message(CmdMessage::error(format!(
                "{}: {} in {}, left untouched",
                locale,
                reason,
                dest.path_of(locale, file).display()
            )));
            return Ok(report(LocaleStatus::Failed, 0));
        }
        Err(e) => return Err(e),
    };

    let entries = extraction.table.len();
    let updated = rebuilt.render();
    if updated == current {
        debug!("destination already up to date");
        return Ok(report(LocaleStatus::Unchanged, entries));
    }

    if dry_run {
        result.add_message(CmdMessage::info(format!(
            "Would update {} ({} entries)",
            locale, entries
        )));
        return Ok(report(LocaleStatus::Pending, entries));
    }

    dest.write(locale, file, &updated)?;
    debug!(entries, "destination rewritten");
    result.add_message(CmdMessage::success(format!(
        "Updated {} ({} entries)",
        locale, entries
    )));
    Ok(report(LocaleStatus::Updated, entries))
}

/// Reports a file that exists but cannot be read as text, such as one that
/// is not valid UTF-8.
fn unreadable(locale: &str, path: &Path, err: &io::Error, result: &mut CmdResult) -> LocaleReport {
    result.add_message(CmdMessage::error(format!(
        "{}: cannot read {}: {}, left untouched",
        locale,
        path.display(),
        err
    )));
    LocaleReport {
        locale: locale.to_string(),
        status: LocaleStatus::Failed,
        entries: 0,
    }
}

fn summary(result: &CmdResult, dry_run: bool) -> CmdMessage {
    let changed = if dry_run {
        format!("{} to update", result.count(LocaleStatus::Pending))
    } else {
        format!("{} updated", result.count(LocaleStatus::Updated))
    };
    let text = format!(
        "{} locale(s): {}, {} unchanged, {} skipped, {} failed",
        result.reports.len(),
        changed,
        result.count(LocaleStatus::Unchanged),
        result.count(LocaleStatus::Skipped),
        result.count(LocaleStatus::Failed)
    );

    if result.count(LocaleStatus::Failed) > 0 {
        CmdMessage::warning(text)
    } else {
        CmdMessage::info(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::markup::{is_begin_sentinel, is_end_sentinel, sentinel_line, BEGIN_MARKER, END_MARKER};
    use crate::store::memory::fixtures::{resources, TreeFixture, STRINGS};

    fn config() -> MergeConfig {
        MergeConfig::default()
    }

    #[test]
    fn test_scenario_fresh_destination() {
        let TreeFixture { source, mut dest } = TreeFixture::new().with_pair(
            "values-fr",
            "<string name=\"enable_reverse_lookup\">Activer</string>\n",
            "<resources>\n</resources>\n",
        );

        let result = run(&source, &mut dest, &config(), false).unwrap();

        let expected = format!(
            "<resources>\n{}<string name=\"enable_reverse_lookup\">Activer</string>\n{}</resources>\n",
            sentinel_line(BEGIN_MARKER, "\n"),
            sentinel_line(END_MARKER, "\n")
        );
        assert_eq!(dest.get("values-fr", STRINGS), Some(expected.as_str()));
        assert_eq!(result.report("values-fr").unwrap().status, LocaleStatus::Updated);
        assert_eq!(result.report("values-fr").unwrap().entries, 1);
    }

    #[test]
    fn test_idempotent() {
        let source = resources(&[
            "<string name=\"lookup_disclaimer\">Line one\n    <b>two</b></string>",
            "<string name=\"enable_reverse_lookup\">On</string>",
            "<string name=\"lookup_settings_description\">Desc</string>",
        ]);
        let dest = resources(&["<string name=\"hand_written\">Keep me</string>"]);
        let TreeFixture { source, mut dest } =
            TreeFixture::new().with_pair("values-de", &source, &dest);

        run(&source, &mut dest, &config(), false).unwrap();
        let first = dest.get("values-de", STRINGS).unwrap().to_string();

        let result = run(&source, &mut dest, &config(), false).unwrap();
        assert_eq!(dest.get("values-de", STRINGS).unwrap(), first);
        assert_eq!(result.report("values-de").unwrap().status, LocaleStatus::Unchanged);
        assert!(first.contains("Keep me"));
        assert_eq!(first.matches(BEGIN_MARKER).count(), 2);
    }

    #[test]
    fn test_block_holds_found_subset_in_list_order() {
        let source = resources(&[
            "<string name=\"lookup_disclaimer\">D</string>",
            "<string name=\"not_listed\">N</string>",
            "<string name=\"enable_forward_lookup\">F</string>",
        ]);
        let TreeFixture { source, mut dest } =
            TreeFixture::new().with_pair("values-it", &source, &resources(&[]));

        run(&source, &mut dest, &config(), false).unwrap();

        let text = dest.get("values-it", STRINGS).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "<resources>");
        assert!(is_begin_sentinel(lines[2]));
        assert_eq!(lines[3], "    <string name=\"enable_forward_lookup\">F</string>");
        assert_eq!(lines[4], "    <string name=\"lookup_disclaimer\">D</string>");
        assert!(is_end_sentinel(lines[5]));
        assert!(!text.contains("not_listed"));
    }

    #[test]
    fn test_previous_block_is_replaced() {
        let old_block = format!(
            "{}    <string name=\"enable_people_lookup\">stale</string>\n{}",
            sentinel_line(BEGIN_MARKER, "\n"),
            sentinel_line(END_MARKER, "\n")
        );
        let dest = format!(
            "<resources>\n{}    <string name=\"mine\">M</string>\n</resources>\n",
            old_block
        );
        let source = resources(&["<string name=\"enable_reverse_lookup\">fresh</string>"]);
        let TreeFixture { source, mut dest } =
            TreeFixture::new().with_pair("values-es", &source, &dest);

        run(&source, &mut dest, &config(), false).unwrap();

        let text = dest.get("values-es", STRINGS).unwrap();
        assert!(!text.contains("stale"));
        assert!(text.contains("fresh"));
        assert!(text.contains("<string name=\"mine\">M</string>"));
        assert_eq!(text.matches(END_MARKER).count(), 2);
    }

    #[test]
    fn test_renamed_entry_lands_under_new_name() {
        let source = resources(&["<string name=\"lookup_settings_description\">Desc</string>"]);
        let TreeFixture { source, mut dest } =
            TreeFixture::new().with_pair("values-nl", &source, &resources(&[]));

        run(&source, &mut dest, &config(), false).unwrap();

        let text = dest.get("values-nl", STRINGS).unwrap();
        assert!(text.contains("<string name=\"lookup_settings_description_merged\">Desc</string>"));
    }

    #[test]
    fn test_missing_files_skip_locale() {
        let original = resources(&["<string name=\"x\">X</string>"]);
        let mut fixture = TreeFixture::new()
            .with_source("values-fr", &resources(&["<string name=\"enable_reverse_lookup\">A</string>"]))
            .with_dest("values-pl", &original);
        fixture.source = fixture.source.with_locale("values-pl");

        let TreeFixture { source, mut dest } = fixture;
        let result = run(&source, &mut dest, &config(), false).unwrap();

        assert_eq!(result.report("values-fr").unwrap().status, LocaleStatus::Skipped);
        assert_eq!(result.report("values-pl").unwrap().status, LocaleStatus::Skipped);
        assert_eq!(dest.get("values-pl", STRINGS), Some(original.as_str()));
        assert!(dest.get("values-fr", STRINGS).is_none());

        let warnings: Vec<_> = result
            .messages
            .iter()
            .filter(|m| m.level == MessageLevel::Warning)
            .map(|m| m.content.as_str())
            .collect();
        assert!(warnings.iter().any(|w| w.contains("values-fr") && w.contains("destination")));
        assert!(warnings.iter().any(|w| w.contains("values-pl") && w.contains("source")));
    }

    #[test]
    fn test_malformed_destination_is_left_untouched() {
        let broken = format!(
            "<resources>\n{}<string name=\"x\">X</string>\n</resources>\n",
            sentinel_line(BEGIN_MARKER, "\n")
        );
        let source = resources(&["<string name=\"enable_reverse_lookup\">A</string>"]);
        let TreeFixture { source, mut dest } = TreeFixture::new()
            .with_pair("values-ru", &source, &broken)
            .with_pair("values-sv", &source, &resources(&[]));

        let result = run(&source, &mut dest, &config(), false).unwrap();

        assert_eq!(dest.get("values-ru", STRINGS), Some(broken.as_str()));
        assert_eq!(result.report("values-ru").unwrap().status, LocaleStatus::Failed);
        assert_eq!(result.report("values-sv").unwrap().status, LocaleStatus::Updated);
        assert!(result
            .messages
            .iter()
            .any(|m| m.level == MessageLevel::Error && m.content.contains("values-ru")));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let source = resources(&["<string name=\"enable_reverse_lookup\">A</string>"]);
        let original = resources(&[]);
        let TreeFixture { source, mut dest } =
            TreeFixture::new().with_pair("values-fi", &source, &original);

        let result = run(&source, &mut dest, &config(), true).unwrap();

        assert_eq!(dest.get("values-fi", STRINGS), Some(original.as_str()));
        assert_eq!(result.report("values-fi").unwrap().status, LocaleStatus::Pending);
        assert!(result.messages.iter().any(|m| m.content.contains("Would update values-fi")));
    }

    #[test]
    fn test_unterminated_source_entry_is_warned_and_skipped() {
        let source = "<resources>\n<string name=\"enable_reverse_lookup\">open\n<string name=\"lookup_disclaimer\">D</string>\n";
        let TreeFixture { source, mut dest } =
            TreeFixture::new().with_pair("values-cs", source, &resources(&[]));

        let result = run(&source, &mut dest, &config(), false).unwrap();

        assert!(result
            .messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning && m.content.contains("enable_reverse_lookup")));
        let text = dest.get("values-cs", STRINGS).unwrap();
        assert!(text.contains("lookup_disclaimer"));
        assert!(!text.contains("open"));
    }

    #[test]
    fn test_non_locale_directories_are_ignored() {
        let mut fixture = TreeFixture::new();
        fixture.source = fixture.source.with_file("drawable", STRINGS, &resources(&[]));
        let TreeFixture { source, mut dest } = fixture;

        let result = run(&source, &mut dest, &config(), false).unwrap();
        assert!(result.reports.is_empty());
    }

    #[test]
    fn test_summary_message() {
        let TreeFixture { source, mut dest } = TreeFixture::new()
            .with_pair("values-fr", &resources(&[]), &resources(&[]))
            .with_source("values-ja", &resources(&[]));

        let result = run(&source, &mut dest, &config(), false).unwrap();
        let summary = result.messages.last().unwrap();
        assert_eq!(
            summary.content,
            "2 locale(s): 1 updated, 0 unchanged, 1 skipped, 0 failed"
        );
    }

    #[test]
    fn test_entries_sharing_source_lines_stay_separate() {
        let source = "<resources>\n    <string name=\"enable_reverse_lookup\">R</string><string name=\"enable_people_lookup\">P</string>\n</resources>\n";
        let TreeFixture { source, mut dest } =
            TreeFixture::new().with_pair("values-hu", source, &resources(&[]));

        run(&source, &mut dest, &config(), false).unwrap();

        let text = dest.get("values-hu", STRINGS).unwrap();
        assert_eq!(text.matches("name=\"enable_reverse_lookup\"").count(), 1);
        assert_eq!(text.matches("name=\"enable_people_lookup\"").count(), 1);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[3], "    <string name=\"enable_reverse_lookup\">R</string>");
        assert_eq!(lines[4], "    <string name=\"enable_people_lookup\">P</string>");
    }

    #[test]
    fn test_single_line_source_file() {
        let source = "<resources><string name=\"enable_reverse_lookup\">A</string><string name=\"not_listed\">N</string></resources>";
        let dest = "<resources>\n    <string name=\"own\">O</string>\n</resources>\n";
        let TreeFixture { source, mut dest } =
            TreeFixture::new().with_pair("values-el", source, dest);

        run(&source, &mut dest, &config(), false).unwrap();

        let expected = format!(
            "<resources>\n{}<string name=\"enable_reverse_lookup\">A</string>\n{}    <string name=\"own\">O</string>\n</resources>\n",
            sentinel_line(BEGIN_MARKER, "\n"),
            sentinel_line(END_MARKER, "\n")
        );
        assert_eq!(dest.get("values-el", STRINGS), Some(expected.as_str()));
    }

    #[test]
    fn test_unreadable_source_fails_only_its_locale() {
        use crate::store::fs::FileStore;
        use std::fs;
        use tempfile::TempDir;

        let temp = TempDir::new().unwrap();
        let (src, dst) = (temp.path().join("src"), temp.path().join("dst"));
        for locale in ["values-bg", "values-da"] {
            fs::create_dir_all(src.join(locale)).unwrap();
            fs::create_dir_all(dst.join(locale)).unwrap();
            fs::write(dst.join(locale).join(STRINGS), resources(&[])).unwrap();
        }
        fs::write(src.join("values-bg").join(STRINGS), b"<resources>\xff\xfe</resources>").unwrap();
        fs::write(
            src.join("values-da").join(STRINGS),
            resources(&["<string name=\"enable_reverse_lookup\">A</string>"]),
        )
        .unwrap();

        let source = FileStore::new(&src);
        let mut dest = FileStore::new(&dst);
        let result = run(&source, &mut dest, &config(), false).unwrap();

        assert_eq!(result.report("values-bg").unwrap().status, LocaleStatus::Failed);
        assert_eq!(result.report("values-da").unwrap().status, LocaleStatus::Updated);
        assert_eq!(
            fs::read_to_string(dst.join("values-bg").join(STRINGS)).unwrap(),
            resources(&[])
        );
        assert!(result
            .messages
            .iter()
            .any(|m| m.level == MessageLevel::Error && m.content.contains("values-bg: cannot read")));
    }
}
