use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, run};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert!(
        parsed.get("includes").is_some(),
        "Config should have 'includes' field"
    );
    assert_eq!(parsed["lookupFunction"], "t");
    assert_eq!(parsed["translationsFile"], "./i18n/translations.json");

    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let (code, stdout, _) = run({
        let mut cmd = test.command();
        cmd.arg("init");
        cmd
    })?;

    assert_eq!(code, Some(0));
    insta::assert_snapshot!(stdout.trim_end(), @"✓ Created .glotmodrc.json");
    assert!(test.root().join(".glotmodrc.json").exists());

    let content = test.read_file(".glotmodrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".glotmodrc.json", "{}")?;

    let (code, stdout, output) = run({
        let mut cmd = test.command();
        cmd.arg("init");
        cmd
    })?;

    assert_eq!(code, Some(1));
    assert!(stdout.is_empty());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains(".glotmodrc.json already exists"));
    assert_eq!(test.read_file(".glotmodrc.json")?, "{}");

    Ok(())
}
