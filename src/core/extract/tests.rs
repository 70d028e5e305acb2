use pretty_assertions::assert_eq;

use crate::{
    core::{
        classify::{FileInfo, FileKind},
        extract::{EngineOptions, FileOutcome, process_file},
        keygen::KeyGenerator,
        stats::{FileStats, SkipReason},
        table::{Signature, TranslationEntry, TranslationTable},
    },
    test_utils::{FailingKeyGenerator, FixedKeyGenerator, SequentialKeyGenerator},
};

const PATH: &str = "src/App.tsx";

async fn process<G: KeyGenerator>(
    code: &str,
    file: &FileInfo,
    table: &mut TranslationTable,
    keygen: &mut G,
) -> (String, FileOutcome) {
    let outcome = process_file(
        code.to_string(),
        file,
        table,
        keygen,
        &EngineOptions::default(),
    )
    .await
    .unwrap();
    let output = outcome.rewritten.clone().unwrap_or_else(|| code.to_string());
    (output, outcome)
}

/// Extract `code` as `src/App.tsx` against an empty table.
async fn extract(code: &str) -> (String, FileOutcome, TranslationTable) {
    let mut table = TranslationTable::new();
    let mut keygen = SequentialKeyGenerator::new("app");
    let file = FileInfo::new(PATH, FileKind::Component);
    let (output, outcome) = process(code, &file, &mut table, &mut keygen).await;
    assert!(outcome.integrity.is_clean(), "{:?}", outcome.integrity);
    (output, outcome, table)
}

fn reasons(outcome: &FileOutcome) -> Vec<String> {
    outcome
        .stats
        .unrecognized_samples
        .iter()
        .map(|s| format!("{}={}", s.reason, s.text))
        .collect()
}

// ============================================================
// Concrete scenarios
// ============================================================

#[tokio::test]
async fn test_markup_text_child_is_wrapped() {
    let (output, outcome, table) = extract(
        r#"export function Dialog() {
  return <p>确认删除吗？</p>;
}
"#,
    )
    .await;

    assert_eq!(
        output,
        r#"import t from "@/i18n";
export function Dialog() {
  return <p>{t("app.k1")}</p>;
}
"#
    );
    assert_eq!(outcome.stats.extracted, 1);
    assert_eq!(
        table.get("app.k1"),
        Some(&TranslationEntry {
            text: "确认删除吗？".to_string(),
            source_file: PATH.to_string(),
            interpolations: vec![],
        })
    );
}

#[tokio::test]
async fn test_template_literal_becomes_interpolated_lookup() {
    let (output, outcome, table) =
        extract("export const greet = (name: string) => `欢迎回来，${name}`;\n").await;

    assert_eq!(
        output,
        "import t from \"@/i18n\";\nexport const greet = (name: string) => t(\"app.k1\", { name });\n"
    );
    assert_eq!(outcome.stats.interpolation_count, 1);
    let entry = table.get("app.k1").unwrap();
    assert_eq!(entry.text, "欢迎回来，{name}");
    assert_eq!(entry.interpolations, vec!["name"]);
}

#[tokio::test]
async fn test_existing_key_is_reused() {
    let mut table = TranslationTable::from_entries([(
        "common.action.save".to_string(),
        TranslationEntry {
            text: "保存".to_string(),
            source_file: "src/Toolbar.tsx".to_string(),
            interpolations: vec![],
        },
    )]);
    let mut keygen = SequentialKeyGenerator::new("app");
    let file = FileInfo::new(PATH, FileKind::Component);

    let (output, outcome) = process(
        "export const Save = () => <button>保存</button>;\n",
        &file,
        &mut table,
        &mut keygen,
    )
    .await;

    assert_eq!(
        output,
        "import t from \"@/i18n\";\nexport const Save = () => <button>{t(\"common.action.save\")}</button>;\n"
    );
    assert_eq!(outcome.stats.reused_keys, 1);
    assert_eq!(outcome.new_keys, 0);
    assert_eq!(table.len(), 1);
    assert_eq!(keygen.batches, 0);
}

#[tokio::test]
async fn test_top_level_binding_records_deferred_warning() {
    let (output, outcome, _) = extract("const TITLE = \"欢迎使用控制台\";\n").await;

    assert_eq!(
        output,
        "import t from \"@/i18n\";\nconst TITLE = t(\"app.k1\");\n"
    );
    assert_eq!(outcome.stats.deferred_bindings, 1);
    let binding = &outcome.deferred[0];
    assert_eq!(binding.name, "TITLE");
    assert_eq!(binding.key, "app.k1");
    assert_eq!(binding.location.to_string(), "src/App.tsx:1:7");
}

#[tokio::test]
async fn test_skip_listed_call_is_left_alone() {
    let code = r#"export function save() {
  console.log("调试信息");
}
"#;
    let (output, outcome, table) = extract(code).await;

    assert_eq!(output, code);
    assert!(outcome.rewritten.is_none());
    assert!(table.is_empty());
    assert_eq!(reasons(&outcome), vec!["skipFunctionCall:console.log=调试信息"]);
    assert!(outcome.stats.missing_samples.is_empty());
}

#[tokio::test]
async fn test_second_pass_is_idempotent() {
    let code = r#"export const MENU = [{ label: "首页" }];
export function Card({ user }) {
  const hint = user.name || "匿名用户";
  return <p title="提示">你好，{user.name}！{`共${user.count}条`}</p>;
}
"#;
    let mut table = TranslationTable::new();
    let mut keygen = SequentialKeyGenerator::new("app");
    let file = FileInfo::new(PATH, FileKind::Component);

    let (first, outcome) = process(code, &file, &mut table, &mut keygen).await;
    assert!(outcome.stats.extracted > 0);
    assert!(outcome.stats.missing_samples.is_empty());
    let entries = table.len();

    let (second, outcome) = process(&first, &file, &mut table, &mut keygen).await;
    assert_eq!(second, first);
    assert!(outcome.rewritten.is_none());
    assert_eq!(outcome.stats.extracted, 0);
    assert!(outcome.stats.missing_samples.is_empty());
    assert_eq!(table.len(), entries);
}

#[tokio::test]
async fn test_wrapped_literal_is_untouched() {
    let code = "export const a = () => t(\"common.foo\");\nexport const b = () => i18n.t(\"common.bar\", { name: \"张三\" });\n";
    let (output, outcome, _) = extract(code).await;
    assert_eq!(output, code);
    assert_eq!(outcome.stats, FileStats::default());
}

// ============================================================
// Dedup and collisions
// ============================================================

#[tokio::test]
async fn test_identical_texts_share_one_key() {
    let (output, outcome, table) =
        extract("export const a = () => \"保存\";\nexport const b = () => \"保存\";\n").await;

    assert_eq!(
        output,
        "import t from \"@/i18n\";\nexport const a = () => t(\"app.k1\");\nexport const b = () => t(\"app.k1\");\n"
    );
    assert_eq!(outcome.stats.extracted, 2);
    assert_eq!(outcome.stats.reused_keys, 1);
    assert_eq!(outcome.new_keys, 1);
    assert_eq!(table.len(), 1);
}

#[tokio::test]
async fn test_generator_collision_never_merges_texts() {
    let mut table = TranslationTable::new();
    let mut keygen = FixedKeyGenerator::new(["app.same", "app.same"]);
    let file = FileInfo::new(PATH, FileKind::Component);

    let (output, outcome) = process(
        "export const a = () => [\"保存\", \"取消\"];\n",
        &file,
        &mut table,
        &mut keygen,
    )
    .await;

    assert_eq!(
        output,
        "import t from \"@/i18n\";\nexport const a = () => [t(\"app.same\"), t(\"app.same_2\")];\n"
    );
    assert_eq!(outcome.collisions.len(), 1);
    assert_eq!(outcome.collisions[0].assigned_key, "app.same_2");
    for entry in table.entries().values() {
        let key = table.find(&Signature::new(&entry.text, &entry.interpolations));
        assert_eq!(table.get(key.unwrap()).unwrap().text, entry.text);
    }
}

#[tokio::test]
async fn test_key_generation_failure_leaves_table_untouched() {
    let mut table = TranslationTable::new();
    let file = FileInfo::new(PATH, FileKind::Component);

    let err = process_file(
        "export const a = () => \"保存\";\n".to_string(),
        &file,
        &mut table,
        &mut FailingKeyGenerator,
        &EngineOptions::default(),
    )
    .await
    .unwrap_err();

    assert!(format!("{:#}", err).contains("Failed to assign keys for src/App.tsx"));
    assert!(table.is_empty());
}

#[tokio::test]
async fn test_parse_failure_is_an_error() {
    let mut table = TranslationTable::new();
    let file = FileInfo::new(PATH, FileKind::Component);
    let result = process_file(
        "export const = ;".to_string(),
        &file,
        &mut table,
        &mut SequentialKeyGenerator::new("app"),
        &EngineOptions::default(),
    )
    .await;
    assert!(result.is_err());
}

// ============================================================
// Coverage
// ============================================================

#[tokio::test]
async fn test_coverage_fixture_leaves_nothing_behind() {
    let (output, outcome, table) = extract(
        r#"import React from "react";

export const TITLE = "控制台";
export const MENU = [
  { label: "首页", path: "/" },
  { label: "设置", path: "/settings" },
];

export function UserCard({ user, items, loading }: Props) {
  const status = loading ? "加载中" : "已完成";
  const hint = user.name || "匿名用户";
  const fallback = user.nickname ?? "无昵称";
  const summary = "共" + items.length + "条";
  const tags = ["新", "热门", ...user.tags];
  return (
    <div title="用户卡片">
      <h1>欢迎回来，{user.name}！</h1>
      <p>{status}</p>
      <span>{loading && "请稍候"}</span>
      {`最后登录：${user.lastLogin}`}
      <footer>版权所有</footer>
    </div>
  );
}
"#,
    )
    .await;

    assert!(
        outcome.stats.missing_samples.is_empty(),
        "{:?}",
        outcome.stats.missing_samples
    );
    assert!(outcome.stats.unrecognized_samples.is_empty());
    assert_eq!(outcome.stats.extracted, 15);
    assert_eq!(table.len(), 15);
    assert_eq!(outcome.stats.lazy_accessors, 2);
    assert_eq!(outcome.stats.deferred_bindings, 1);
    assert_eq!(outcome.stats.interpolation_count, 3);

    assert!(output.starts_with("import t from \"@/i18n\";\nimport React from \"react\";\n"));
    assert!(output.contains("{ get label() { return t(\"app."));
    assert!(output.contains("<h1>{t(\"app."));
    assert!(output.contains("\", { name: user.name })}</h1>"));
    assert!(output.contains("\", { length: items.length })"));
    assert!(output.contains("\", { lastLogin: user.lastLogin })}"));
    assert!(output.contains("...user.tags]"));
    assert!(!output.contains("版权所有"));
}

#[tokio::test]
async fn test_markup_run_keeps_surrounding_whitespace() {
    let (output, _, table) = extract(
        r#"export const Hello = ({ name }) => (
  <p>
    你好，{name}！
  </p>
);
"#,
    )
    .await;

    assert_eq!(
        output,
        r#"import t from "@/i18n";
export const Hello = ({ name }) => (
  <p>
    {t("app.k1", { name })}
  </p>
);
"#
    );
    assert_eq!(table.get("app.k1").unwrap().text, "你好，{name}！");
}

// ============================================================
// Deferred evaluation
// ============================================================

#[tokio::test]
async fn test_objects_in_functions_stay_eager() {
    let (output, outcome, _) =
        extract("export function labels() {\n  return { label: \"名称\" };\n}\n").await;
    assert!(output.contains("return { label: t(\"app.k1\") };"));
    assert_eq!(outcome.stats.lazy_accessors, 0);
}

#[tokio::test]
async fn test_default_export_object_uses_getters() {
    let (output, outcome, _) = extract("export default { title: \"标题\", size: 3 };\n").await;
    assert_eq!(
        output,
        "import t from \"@/i18n\";\nexport default { get title() { return t(\"app.k1\"); }, size: 3 };\n"
    );
    assert_eq!(outcome.stats.lazy_accessors, 1);
    assert!(outcome.deferred.is_empty());
}

#[tokio::test]
async fn test_function_valued_properties_are_not_wrapped() {
    let (output, outcome, _) =
        extract("export const actions = { confirm: () => \"确认\" };\n").await;
    assert!(output.contains("{ confirm: () => t(\"app.k1\") }"));
    assert_eq!(outcome.stats.lazy_accessors, 0);
    assert!(outcome.deferred.is_empty());
}

#[tokio::test]
async fn test_nested_objects_and_arrays_get_getters() {
    let (output, outcome, _) = extract(
        "export const FORM = { options: [\"是\", \"否\"], nested: { label: \"名称\" } };\n",
    )
    .await;

    assert_eq!(
        output,
        "import t from \"@/i18n\";\nexport const FORM = { get options() { return [t(\"app.k1\"), t(\"app.k2\")]; }, nested: { get label() { return t(\"app.k3\"); } } };\n"
    );
    assert_eq!(outcome.stats.lazy_accessors, 2);
    assert!(outcome.deferred.is_empty());
    assert_eq!(outcome.container_accessors.len(), 1);
    assert_eq!(outcome.container_accessors[0].to_string(), "src/App.tsx:1:23");
}

#[tokio::test]
async fn test_static_class_field_is_a_deferred_binding() {
    let (output, outcome, _) =
        extract("export class A {\n  static title = \"静态标题\";\n  label = \"名称\";\n}\n").await;

    assert_eq!(
        output,
        "import t from \"@/i18n\";\nexport class A {\n  static title = t(\"app.k1\");\n  label = t(\"app.k2\");\n}\n"
    );
    assert_eq!(outcome.deferred.len(), 1);
    assert_eq!(outcome.deferred[0].name, "A.title");
    assert_eq!(outcome.deferred[0].key, "app.k1");
}

#[tokio::test]
async fn test_default_exported_string_is_a_deferred_binding() {
    let (output, outcome, _) = extract("export default \"文本\";\n").await;

    assert_eq!(output, "import t from \"@/i18n\";\nexport default t(\"app.k1\");\n");
    assert_eq!(outcome.deferred.len(), 1);
    assert_eq!(outcome.deferred[0].name, "default");
    assert_eq!(outcome.deferred[0].key, "app.k1");
    assert_eq!(outcome.deferred[0].location.to_string(), "src/App.tsx:1:1");
}

// ============================================================
// Semantic guards
// ============================================================

#[tokio::test]
async fn test_scopes_binding_the_lookup_name_are_left_alone() {
    let code = "export const List = ({ items }) => items.map((t) => <li key={t.id}>删除</li>);\n";
    let (output, outcome, table) = extract(code).await;

    assert_eq!(output, code);
    assert!(table.is_empty());
    assert_eq!(reasons(&outcome), vec!["shadowedLookup=删除"]);
    assert!(outcome.stats.missing_samples.is_empty());
}

#[tokio::test]
async fn test_text_outside_a_shadowing_scope_is_still_extracted() {
    let (output, outcome, _) = extract(
        r#"export function Page({ rows }) {
  const title = "订单";
  const cells = rows.map((row) => {
    const t = row.type;
    return <td title="未知">{t}</td>;
  });
  return <table title={title}>{cells}</table>;
}
"#,
    )
    .await;

    assert_eq!(
        output,
        r#"import t from "@/i18n";
export function Page({ rows }) {
  const title = t("app.k1");
  const cells = rows.map((row) => {
    const t = row.type;
    return <td title="未知">{t}</td>;
  });
  return <table title={title}>{cells}</table>;
}
"#
    );
    assert_eq!(reasons(&outcome), vec!["shadowedLookup=未知"]);
    assert!(outcome.stats.missing_samples.is_empty());
}

#[tokio::test]
async fn test_module_specifiers_are_not_messages() {
    let code = "export const load = () => import(\"./页面\");\nexport const data = require(\"./数据\");\n";
    let (output, outcome, table) = extract(code).await;

    assert_eq!(output, code);
    assert!(table.is_empty());
    assert_eq!(
        reasons(&outcome),
        vec!["moduleSpecifier=./页面", "moduleSpecifier=./数据"]
    );
    assert!(outcome.stats.missing_samples.is_empty());
}

#[tokio::test]
async fn test_comparisons_keep_their_literals() {
    let (output, outcome, _) = extract(
        r#"export function label(status: string) {
  if (status === "成功") {
    return "完成";
  }
  switch (status) {
    case "失败":
      return "重试";
  }
}
"#,
    )
    .await;

    assert!(output.contains("status === \"成功\""));
    assert!(output.contains("case \"失败\":"));
    assert!(output.contains("return t(\"app.k1\");"));
    assert!(output.contains("return t(\"app.k2\");"));
    assert_eq!(reasons(&outcome), vec!["comparison=成功", "comparison=失败"]);
    assert!(outcome.stats.missing_samples.is_empty());
}

#[tokio::test]
async fn test_enum_members_and_member_keys_are_recorded() {
    let code = "enum Color { Red = \"红色\" }\nexport const v = () => map[\"名称\"];\n";
    let (output, outcome, _) = extract(code).await;

    assert_eq!(output, code);
    assert_eq!(reasons(&outcome), vec!["enumMember=红色", "memberKey=名称"]);
    assert!(outcome.stats.missing_samples.is_empty());
}

#[tokio::test]
async fn test_tagged_templates_are_opaque() {
    let code = "export const s = () => css`color: 红色;`;\n";
    let (output, outcome, _) = extract(code).await;
    assert_eq!(output, code);
    assert!(outcome.stats.missing_samples.is_empty());
}

#[tokio::test]
async fn test_const_assertion_is_replaced_whole() {
    let (output, _, _) = extract("export const s = () => \"启用\" as const;\n").await;
    assert!(output.contains("export const s = () => t(\"app.k1\");"));
}

#[tokio::test]
async fn test_numeric_prefix_is_not_concatenated() {
    let (output, _, table) = extract("export const n = (a, b) => a + b + \"个\";\n").await;
    assert!(output.contains("a + b + t(\"app.k1\")"));
    assert_eq!(table.get("app.k1").unwrap().text, "个");
}

#[tokio::test]
async fn test_style_children_are_untouched() {
    let code = "export const S = () => <style>{\".a::after { content: '注意' }\"}</style>;\n";
    let (output, outcome, _) = extract(code).await;
    assert_eq!(output, code);
    assert!(outcome.stats.missing_samples.is_empty());
}

#[tokio::test]
async fn test_pure_data_files_keep_markup_text_only() {
    let mut table = TranslationTable::new();
    let mut keygen = SequentialKeyGenerator::new("menu");
    let file = FileInfo::new("src/data/menu.tsx", FileKind::Data);

    let (output, outcome) = process(
        "export const menu = () => <span title=\"菜单\">首页</span>;\n",
        &file,
        &mut table,
        &mut keygen,
    )
    .await;

    assert!(output.contains("<span title={t(\"menu.k1\")}>首页</span>"));
    assert_eq!(reasons(&outcome), vec!["data-file-skip=首页"]);
    assert!(outcome.stats.missing_samples.is_empty());
}

// ============================================================
// Limits and imports
// ============================================================

#[tokio::test]
async fn test_depth_limit_surfaces_as_missing() {
    let code = "export const a = () => [[[[[[[[[[[[\"深\"]]]]]]]]]]]];\n";
    let (output, outcome, _) = extract(code).await;

    assert_eq!(output, code);
    assert_eq!(outcome.stats.missing_samples.len(), 1);
    assert_eq!(outcome.stats.missing_samples[0].text, "深");
    assert_eq!(outcome.stats.missing_samples[0].reason, SkipReason::Unextracted);
}

#[tokio::test]
async fn test_existing_default_import_is_aliased() {
    let (output, _, _) =
        extract("import translate from \"@/i18n\";\nexport const a = () => \"保存\";\n").await;
    assert_eq!(
        output,
        "import translate from \"@/i18n\";\nconst t = translate;\nexport const a = () => t(\"app.k1\");\n"
    );
}

#[tokio::test]
async fn test_custom_lookup_function() {
    let mut table = TranslationTable::new();
    let options = EngineOptions {
        lookup_function: "$t".to_string(),
        import_source: "@/locales".to_string(),
        ..Default::default()
    };
    let file = FileInfo::new(PATH, FileKind::Component);

    let outcome = process_file(
        "export const a = () => \"保存\";\n".to_string(),
        &file,
        &mut table,
        &mut SequentialKeyGenerator::new("app"),
        &options,
    )
    .await
    .unwrap();

    assert_eq!(
        outcome.rewritten.unwrap(),
        "import $t from \"@/locales\";\nexport const a = () => $t(\"app.k1\");\n"
    );
}
