//! Integration tests for DDL generation from extracted model source

use schemabridge_codegen::prelude::*;
use schemabridge_schema::Table;
use schemabridge_types::{Dialect, TypeMap};

const MODELS: &str = r#"
using System.ComponentModel;
using System.ComponentModel.DataAnnotations;
using System.ComponentModel.DataAnnotations.Schema;

namespace Blog;

[Description("Blog posts")]
public class Post
{
    public int Id { get; set; }

    [Required, StringLength(120)]
    [Description("Headline")]
    public string Title { get; set; }

    public string Body { get; set; }

    public decimal Price { get; set; }

    public bool Published { get; set; } = true;

    public DateTime UpdatedAt { get; set; }
}
"#;

fn extract(dialect: Dialect) -> Table {
    let mut tables = ModelIntrospector::new()
        .extract(TypeMap::for_dialect(dialect), &[MODELS])
        .unwrap();
    assert_eq!(tables.len(), 1);
    tables.remove(0)
}

#[test]
fn test_full_create_and_alter_differ() {
    for dialect in Dialect::ALL {
        let table = extract(*dialect);
        let map = TypeMap::for_dialect(*dialect);
        let create = DdlGenerator::new().render(&table, true, map).unwrap();
        let alter = DdlGenerator::new().render(&table, false, map).unwrap();
        assert_ne!(create, alter);
        assert!(create.starts_with("CREATE TABLE "));
        assert!(alter.starts_with("ALTER TABLE "));
        assert!(!alter.contains("CREATE TABLE"));
    }
}

#[test]
fn test_sqlserver_create() {
    let table = extract(Dialect::SqlServer);
    let sql = DdlGenerator::new()
        .render(&table, true, TypeMap::for_dialect(Dialect::SqlServer))
        .unwrap();
    assert!(sql.starts_with("CREATE TABLE [Post](\n"));
    assert!(sql.contains("\t[Id] INT NOT NULL,\n"));
    assert!(sql.contains("\t[Title] NVARCHAR(120) NOT NULL,\n"));
    assert!(sql.contains("\t[Body] NVARCHAR(64) NULL,\n"));
    assert!(sql.contains("\t[Price] DECIMAL(18,2) NOT NULL,\n"));
    assert!(sql.contains("\t[Published] BIT NOT NULL DEFAULT 1,\n"));
    assert!(sql.contains("\t[UpdatedAt] DATETIME NOT NULL,\n"));
    assert!(sql.contains("\tCONSTRAINT [PK_Post] PRIMARY KEY ([Id])\n);"));
    assert!(sql.contains("N'Blog posts', N'SCHEMA', N'dbo', N'TABLE', N'Post';"));
    assert!(sql.contains("N'Headline', N'SCHEMA', N'dbo', N'TABLE', N'Post', N'COLUMN', N'Title';"));
}

#[test]
fn test_mysql_alter() {
    let table = extract(Dialect::MySql);
    let sql = DdlGenerator::new()
        .render(&table, false, TypeMap::for_dialect(Dialect::MySql))
        .unwrap();
    let statements: Vec<_> = sql.lines().collect();
    assert_eq!(statements.len(), 8);
    assert_eq!(
        statements[0],
        "ALTER TABLE `Post` ADD COLUMN `Id` INT NOT NULL;"
    );
    assert_eq!(
        statements[1],
        "ALTER TABLE `Post` ADD COLUMN `Title` VARCHAR(120) NOT NULL COMMENT 'Headline';"
    );
    assert_eq!(
        statements[4],
        "ALTER TABLE `Post` ADD COLUMN `Published` TINYINT(1) NOT NULL DEFAULT 1;"
    );
    assert_eq!(statements[6], "ALTER TABLE `Post` ADD PRIMARY KEY (`Id`);");
    assert_eq!(statements[7], "ALTER TABLE `Post` COMMENT='Blog posts';");
}

#[test]
fn test_options_toggle_descriptions() {
    let table = extract(Dialect::MySql);
    let options = DdlOptions {
        full_create: true,
        include_descriptions: false,
    };
    let sql = DdlGenerator::new()
        .render_with(&table, &options, TypeMap::for_dialect(Dialect::MySql))
        .unwrap();
    assert!(!sql.contains("COMMENT"));
    assert!(sql.contains("\tPRIMARY KEY (`Id`)\n);"));
}
