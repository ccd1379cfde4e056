use sqlforge::{
    BooleanLiterals, DialectPlatform, Factory, ParamContainer, ParameterType, PlatformConfig,
    SqlError, SqlFunction, Statement,
};

fn users_query(factory: &Factory) -> sqlforge::Select {
    factory
        .select()
        .columns(["u.id", "u.name"])
        .from_as("users", "u")
        .where_eq("u.active", true)
        .where_eq("u.role", vec!["admin", "owner"])
        .order_by_asc("u.name")
        .limit(20)
        .offset(40)
}

#[test]
fn same_query_across_presets() {
    let cases = [
        (
            DialectPlatform::ansi(),
            r#"SELECT "u"."id", "u"."name" FROM "users" AS "u" WHERE "u"."active" = :where1 AND "u"."role" IN (:where2, :where3) ORDER BY "u"."name" ASC LIMIT 20 OFFSET 40"#,
        ),
        (
            DialectPlatform::postgres(),
            r#"SELECT "u"."id", "u"."name" FROM "users" AS "u" WHERE "u"."active" = $1 AND "u"."role" IN ($2, $3) ORDER BY "u"."name" ASC LIMIT 20 OFFSET 40"#,
        ),
        (
            DialectPlatform::mysql(),
            "SELECT `u`.`id`, `u`.`name` FROM `users` AS `u` WHERE `u`.`active` = ? AND `u`.`role` IN (?, ?) ORDER BY `u`.`name` ASC LIMIT 20 OFFSET 40",
        ),
        (
            DialectPlatform::sql_server(),
            "SELECT [u].[id], [u].[name] FROM [users] AS [u] WHERE [u].[active] = @where1 AND [u].[role] IN (@where2, @where3) ORDER BY [u].[name] ASC LIMIT 20 OFFSET 40",
        ),
    ];

    for (platform, expected) in cases {
        let factory = Factory::new(&platform);
        let mut params = ParamContainer::new();
        let sql = users_query(&factory)
            .compile_with_parameters(&mut params, true)
            .unwrap();
        assert_eq!(sql, expected, "dialect {}", platform.config().name);
        assert_eq!(params.len(), 3);
    }
}

#[test]
fn inline_booleans_follow_dialect() {
    let sqlite = Factory::new(&DialectPlatform::sqlite());
    let ansi = Factory::new(&DialectPlatform::ansi());

    let build = |f: &Factory| f.update().table("flags").set("enabled", true).compile().unwrap();
    assert_eq!(build(&sqlite), r#"UPDATE "flags" SET "enabled" = 1"#);
    assert_eq!(build(&ansi), r#"UPDATE "flags" SET "enabled" = TRUE"#);
}

#[test]
fn mysql_escapes_backslashes() {
    let factory = Factory::new(&DialectPlatform::mysql());
    let sql = factory
        .insert()
        .into("paths")
        .value("path", r"C:\temp\it's")
        .compile()
        .unwrap();
    assert_eq!(sql, r"INSERT INTO `paths` (`path`) VALUES ('C:\\temp\\it''s')");
}

#[test]
fn platform_from_json_config() {
    let config = PlatformConfig::from_json(
        r#"{
            "name": "warehouse",
            "identifier_quote": { "open": "`", "close": "`" },
            "parameter_type": "position_based",
            "boolean_literals": "numeric",
            "skip_tokens": ["AS", "QUALIFY"]
        }"#,
    )
    .unwrap();
    assert_eq!(config.name, "warehouse");
    assert_eq!(config.parameter_type, ParameterType::PositionBased);
    assert_eq!(config.boolean_literals, BooleanLiterals::Numeric);

    let factory = Factory::new(&DialectPlatform::new(config));
    let sql = factory
        .select()
        .column("x QUALIFY y")
        .from("t")
        .where_eq("ok", true)
        .compile()
        .unwrap();
    assert_eq!(sql, "SELECT `x` QUALIFY `y` FROM `t` WHERE `ok` = 1");
}

#[test]
fn bad_json_config_is_a_config_error() {
    let err = PlatformConfig::from_json(r#"{ "parameter_type": "sometimes" }"#).unwrap_err();
    assert!(matches!(err, SqlError::Config(_)));
}

#[test]
fn function_arguments_per_dialect() {
    let factory = Factory::new(&DialectPlatform::sql_server());
    let mut params = ParamContainer::new();
    let sql = factory
        .select()
        .column_as(
            SqlFunction::new("coalesce").identifier("nick").value("anon"),
            "display",
        )
        .from("users")
        .compile_with_parameters(&mut params, true)
        .unwrap();
    assert_eq!(
        sql,
        "SELECT COALESCE([nick], @function1) AS [display] FROM [users]"
    );
}
