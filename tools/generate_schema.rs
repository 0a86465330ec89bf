//! JSON Schema + Markdown生成ツール
//!
//! src/domain/config.rsの設定構造から以下を自動生成します：
//! 1. JSON Schema (schema/config.json)
//! 2. Markdownドキュメント (CONFIGURATION.md)
//!
//! 実行方法:
//! ```
//! cargo run --bin generate_schema
//! ```

use anyhow::Context;
use chromatrack::domain::config::AppConfig;
use schemars::schema_for;
use serde_json::{Map, Value};
use std::fs;

fn main() -> anyhow::Result<()> {
    println!("JSON Schema + Markdown生成中...");

    // AppConfigからJSON Schemaを生成
    let schema = schema_for!(AppConfig);

    // JSON文字列に変換（prettify）
    let json = serde_json::to_string_pretty(&schema).context("Failed to serialize schema")?;

    // schema/ディレクトリを作成
    fs::create_dir_all("schema").context("Failed to create schema/ directory")?;

    // schema/config.jsonに書き出し
    fs::write("schema/config.json", &json).context("Failed to write schema/config.json")?;
    println!("  ✓ schema/config.json");

    // JSON Schemaをパースしてマークダウン生成
    let schema_value: Value = serde_json::from_str(&json).context("Failed to parse schema")?;
    let markdown = generate_markdown(&schema_value);

    // CONFIGURATION.mdに書き出し
    fs::write("CONFIGURATION.md", markdown).context("Failed to write CONFIGURATION.md")?;
    println!("  ✓ CONFIGURATION.md");

    println!("生成完了: schema/config.json + CONFIGURATION.md");
    Ok(())
}

/// JSON Schemaからマークダウンドキュメントを生成
fn generate_markdown(schema: &Value) -> String {
    let mut md = String::new();

    md.push_str("# 設定リファレンス (Configuration Reference)\n\n");

    md.push_str("## 概要\n\n");
    md.push_str("`config.toml`ファイルは、chromatrackの動作を制御する設定ファイルです。\n\n");
    md.push_str("**設定ファイルの場所**: `config.toml` (プロジェクトルート)  \n");
    md.push_str("**スキーマファイル**: `schema/config.json` (自動生成)  \n");
    md.push_str("**サンプル**: `config.toml.example`\n\n");

    md.push_str("このドキュメント（CONFIGURATION.md）は `cargo run --bin generate_schema` で自動生成されます。\n");
    md.push_str("設定項目の説明を変更する場合は、`src/domain/config.rs`のdoc commentsを編集してください。\n\n");

    md.push_str("## 設定項目\n\n");

    // $defsを取得してマップを作成
    let defs = schema
        .get("$defs")
        .and_then(|d| d.as_object())
        .cloned()
        .unwrap_or_default();

    // トップレベルのプロパティを処理
    if let Some(props) = schema.get("properties").and_then(|p| p.as_object()) {
        for (key, prop) in props {
            generate_property_section(&mut md, key, prop, &defs);
        }
    }

    md
}

/// プロパティセクションを生成
fn generate_property_section(md: &mut String, key: &str, schema: &Value, defs: &Map<String, Value>) {
    let section_name = format_section_name(key);
    md.push_str(&format!("### [{}] - {}\n\n", key, section_name));

    if let Some(desc) = schema.get("description").and_then(|d| d.as_str()) {
        md.push_str(&format!("{}\n\n", desc));
    }

    // $refの場合、定義を取得
    if let Some(ref_str) = schema.get("$ref").and_then(|r| r.as_str()) {
        if let Some(def_name) = ref_str.strip_prefix("#/$defs/") {
            if let Some(def_schema) = defs.get(def_name) {
                generate_properties_table(md, def_schema, defs);
            }
        }
    }

    // 直接プロパティを持つ場合
    if schema.get("properties").is_some() {
        generate_properties_table(md, schema, defs);
    }
}

/// プロパティテーブルを生成
fn generate_properties_table(md: &mut String, schema: &Value, defs: &Map<String, Value>) {
    if let Some(props) = schema.get("properties").and_then(|p| p.as_object()) {
        if props.is_empty() {
            return;
        }

        md.push_str("| 設定項目 | 型 | デフォルト | 説明 |\n");
        md.push_str("|---------|-----|---------|---------|\n");

        for (prop_key, prop_schema) in props {
            let type_str = get_type_string(prop_schema, defs).replace('|', "\\|");
            let default = get_default_value(prop_schema);
            let description = get_description(prop_schema);

            md.push_str(&format!(
                "| `{}` | {} | {} | {} |\n",
                prop_key, type_str, default, description
            ));
        }
        md.push('\n');

        // ネストされたオブジェクト（$ref を持つプロパティ）をサブセクションとして処理
        for (prop_key, prop_schema) in props {
            if let Some(ref_str) = prop_schema.get("$ref").and_then(|r| r.as_str()) {
                if let Some(def_name) = ref_str.strip_prefix("#/$defs/") {
                    if let Some(def_schema) = defs.get(def_name) {
                        if def_schema.get("properties").is_some() {
                            md.push_str(&format!(
                                "#### [{}] - {}\n\n",
                                prop_key,
                                format_section_name(prop_key)
                            ));

                            if let Some(desc) =
                                def_schema.get("description").and_then(|d| d.as_str())
                            {
                                md.push_str(&format!("{}\n\n", desc));
                            }

                            generate_properties_table(md, def_schema, defs);
                        }
                    }
                }
            }
        }
    }
}

/// 型を文字列で取得
fn get_type_string(schema: &Value, defs: &Map<String, Value>) -> String {
    // $ref の場合、参照先の型を確認
    if let Some(ref_str) = schema.get("$ref").and_then(|r| r.as_str()) {
        if let Some(def_name) = ref_str.strip_prefix("#/$defs/") {
            if let Some(def_schema) = defs.get(def_name) {
                if def_schema.get("enum").is_some() {
                    return "enum".to_string();
                }
                if def_schema.get("type").and_then(|t| t.as_str()) == Some("object") {
                    return "object".to_string();
                }
                return def_name.to_string();
            }
        }
    }

    if schema.get("enum").is_some() {
        return "enum".to_string();
    }

    match schema.get("type") {
        Some(Value::String(type_str)) => match type_str.as_str() {
            "integer" | "number" => schema
                .get("format")
                .and_then(|f| f.as_str())
                .unwrap_or(type_str)
                .to_string(),
            "boolean" => "bool".to_string(),
            other => other.to_string(),
        },
        Some(Value::Array(types)) => {
            let type_strs: Vec<String> = types
                .iter()
                .filter_map(|t| t.as_str())
                .map(|s| s.to_string())
                .collect();
            type_strs.join(" | ")
        }
        _ => "unknown".to_string(),
    }
}

/// デフォルト値を取得
fn get_default_value(schema: &Value) -> String {
    match schema.get("default") {
        Some(Value::String(s)) => format!("`\"{}\"`", s),
        Some(Value::Number(n)) => format!("`{}`", n),
        Some(Value::Bool(b)) => format!("`{}`", b),
        _ => "-".to_string(),
    }
}

/// 説明文を取得
fn get_description(schema: &Value) -> String {
    if let Some(desc) = schema.get("description").and_then(|d| d.as_str()) {
        return desc
            .replace("\n\n", "<br><br>")
            .replace('\n', " ")
            .replace('|', "\\|");
    }

    if let Some(enum_vals) = schema.get("enum").and_then(|e| e.as_array()) {
        let vals: Vec<String> = enum_vals
            .iter()
            .filter_map(|v| v.as_str().map(|s| format!("`{}`", s)))
            .collect();
        if !vals.is_empty() {
            return format!("値: {}", vals.join(", "));
        }
    }

    "-".to_string()
}

/// セクション名をフォーマット
fn format_section_name(key: &str) -> String {
    match key {
        "source" => "フレームソース設定".to_string(),
        "detect" => "検出設定".to_string(),
        "display" => "表示設定".to_string(),
        "pipeline" => "パイプライン設定".to_string(),
        "red" => "赤クラスHSVレンジ".to_string(),
        "green" => "緑クラスHSVレンジ".to_string(),
        "blue" => "青クラスHSVレンジ".to_string(),
        _ => key.to_string(),
    }
}
