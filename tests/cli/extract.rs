use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, run};

const DIALOG: &str = r#"export function Dialog() {
  return <p>确认删除吗？</p>;
}
"#;

#[test]
fn test_dry_run_reports_and_leaves_files() -> Result<()> {
    let test = CliTest::with_file("src/Dialog.tsx", DIALOG)?;

    let (code, stdout, _) = run(test.extract_command())?;

    assert_eq!(code, Some(1));
    assert!(stdout.contains("Would extract 1 text(s) in 1 file(s):"), "{stdout}");
    assert!(stdout.contains("  - new keys: 1"));
    assert!(stdout.contains("Run with --apply to rewrite these files."));
    assert_eq!(test.read_file("src/Dialog.tsx")?, DIALOG);
    assert!(!test.root().join("i18n/translations.json").exists());

    Ok(())
}

#[test]
fn test_apply_rewrites_and_writes_table() -> Result<()> {
    let test = CliTest::with_file("src/Dialog.tsx", DIALOG)?;

    let (code, stdout, _) = run({
        let mut cmd = test.extract_command();
        cmd.arg("--apply");
        cmd
    })?;

    assert_eq!(code, Some(0), "{stdout}");
    assert!(stdout.contains("Extracted 1 text(s) in 1 file(s):"));
    assert!(stdout.contains("Wrote ./i18n/translations.json"));

    let table: Value = serde_json::from_str(&test.read_file("i18n/translations.json")?)?;
    let entries = table.as_object().unwrap();
    assert_eq!(entries.len(), 1);
    let (key, entry) = entries.iter().next().unwrap();
    assert!(key.starts_with("dialog."), "{key}");
    assert_eq!(entry["text"], "确认删除吗？");
    assert_eq!(entry["sourceFile"], "src/Dialog.tsx");

    let rewritten = test.read_file("src/Dialog.tsx")?;
    assert_eq!(
        rewritten,
        format!(
            "import t from \"@/i18n\";\nexport function Dialog() {{\n  return <p>{{t(\"{}\")}}</p>;\n}}\n",
            key
        )
    );

    let report: Value = serde_json::from_str(&test.read_file("i18n/extract-report.json")?)?;
    assert_eq!(report["totals"]["extracted"], 1);

    // Nothing left on a second run.
    let (code, stdout, _) = run(test.extract_command())?;
    assert_eq!(code, Some(0), "{stdout}");
    assert!(stdout.contains("nothing to extract"));

    Ok(())
}

#[test]
fn test_nothing_to_extract() -> Result<()> {
    let test = CliTest::with_file("src/util.ts", "export const id = (x: number) => x;\n")?;

    let (code, stdout, _) = run(test.extract_command())?;

    assert_eq!(code, Some(0));
    insta::assert_snapshot!(stdout.trim_end(), @"✓ Checked 1 source file - nothing to extract");

    Ok(())
}

#[test]
fn test_broken_file_fails_with_error_status() -> Result<()> {
    let test = CliTest::with_file("src/broken.ts", "export const = ;\n")?;

    let (code, stdout, _) = run(test.extract_command())?;

    assert_eq!(code, Some(2));
    assert!(stdout.contains("error: "));
    assert!(stdout.contains("  --> src/broken.ts"));

    Ok(())
}

#[test]
fn test_skip_listed_calls_are_noted_in_verbose_mode() -> Result<()> {
    let test = CliTest::with_file(
        "src/log.ts",
        "export function save() {\n  console.log(\"调试信息\");\n}\n",
    )?;

    let (code, stdout, _) = run({
        let mut cmd = test.extract_command();
        cmd.arg("-v");
        cmd
    })?;

    assert_eq!(code, Some(0));
    assert!(stdout.contains("note: \"调试信息\"  skipFunctionCall:console.log"));
    assert!(stdout.contains("  --> src/log.ts:2:15"));

    Ok(())
}

#[test]
fn test_config_overrides_lookup_function() -> Result<()> {
    let test = CliTest::with_file("src/a.ts", "export const a = () => \"保存\";\n")?;
    test.write_file(
        ".glotmodrc.json",
        r#"{ "lookupFunction": "$t", "lookupImportSource": "@/locales" }"#,
    )?;

    let (code, _, _) = run({
        let mut cmd = test.extract_command();
        cmd.arg("--apply");
        cmd
    })?;

    assert_eq!(code, Some(0));
    let rewritten = test.read_file("src/a.ts")?;
    assert!(rewritten.starts_with("import $t from \"@/locales\";\n"));
    assert!(rewritten.contains("export const a = () => $t(\"a."));

    Ok(())
}
