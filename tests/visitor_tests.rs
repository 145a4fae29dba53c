mod common;

use common::{groovy, kotlin, scrub};
use gradle_scrub::rewrite::{rewrite, Visitor};
use gradle_scrub::tree::Statement;
use gradle_scrub::{Dialect, Print, RuleSet};

fn drop_everything(_: &Statement) -> bool {
    false
}

// ---------------------------------------------------------------------------
// End-to-end scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_plugin_and_version_removed_inline() {
    let rules = RuleSet::builder().plugins(["unwanted"]).build();
    let out = scrub("plugins { id 'unwanted' version '1.2' }", Dialect::Groovy, &rules);
    assert_eq!(out, "plugins { }");
}

#[test]
fn test_plugin_removed_from_multiline_block() {
    let rules = RuleSet::builder().plugins(["unwanted"]).build();
    let source = "plugins {\n    id 'java'\n    id 'unwanted' version '1.2'\n}\n";
    assert_eq!(
        scrub(source, Dialect::Groovy, &rules),
        "plugins {\n    id 'java'\n}\n"
    );
}

#[test]
fn test_classpath_entry_removed_with_its_line() {
    let rules = RuleSet::builder().classpath(["com.x:y:1.0"]).build();
    assert_eq!(
        scrub("implementation 'com.x:y:1.0'\n", Dialect::Groovy, &rules),
        ""
    );

    let source = "dependencies {\n    implementation 'com.x:y:1.0'\n    implementation 'com.x:z:2.0'\n}\n";
    assert_eq!(
        scrub(source, Dialect::Groovy, &rules),
        "dependencies {\n    implementation 'com.x:z:2.0'\n}\n"
    );
}

#[test]
fn test_method_block_removed() {
    let rules = RuleSet::builder().methods(["signing"]).build();
    let source = "signing {\n    sign publishing.publications\n}\ndependencies {\n}\n";
    assert_eq!(scrub(source, Dialect::Groovy, &rules), "dependencies {\n}\n");
}

// ---------------------------------------------------------------------------
// Decision table
// ---------------------------------------------------------------------------

#[test]
fn test_kotlin_classpath_matches_literal_content() {
    let rules = RuleSet::builder().classpath(["com.x:y:1.0"]).build();
    let source = "dependencies {\n    implementation(\"com.x:y:1.0\")\n    api(\"a:b:1\")\n}\n";
    assert_eq!(
        scrub(source, Dialect::Kotlin, &rules),
        "dependencies {\n    api(\"a:b:1\")\n}\n"
    );
}

#[test]
fn test_classpath_only_applies_to_dependency_calls() {
    let rules = RuleSet::builder().classpath(["com.x:y:1.0"]).build();
    let source = "dependencies {\n    api(\"com.x:y:1.0\")\n}\n";
    assert_eq!(scrub(source, Dialect::Kotlin, &rules), source);
}

#[test]
fn test_buildscript_classpath_removed() {
    let rules = RuleSet::builder()
        .classpath(["com.github.ben-manes:gradle-versions-plugin:0.50.0"])
        .build();
    let source = "buildscript {\n    dependencies {\n        classpath 'com.github.ben-manes:gradle-versions-plugin:0.50.0'\n        classpath 'org.other:plugin:1.0'\n    }\n}\n";
    assert_eq!(
        scrub(source, Dialect::Groovy, &rules),
        "buildscript {\n    dependencies {\n        classpath 'org.other:plugin:1.0'\n    }\n}\n"
    );
}

#[test]
fn test_kotlin_version_call_follows_removed_plugin() {
    let rules = RuleSet::builder().plugins(["x"]).build();
    let source = "plugins {\n    id(\"x\").version(\"1.0\")\n    id(\"y\")\n}\n";
    assert_eq!(
        scrub(source, Dialect::Kotlin, &rules),
        "plugins {\n    id(\"y\")\n}\n"
    );
}

#[test]
fn test_kotlin_infix_chain_removed_whole() {
    let rules = RuleSet::builder().plugins(["org.jetbrains.dokka"]).build();
    let source = "plugins {\n    id(\"org.jetbrains.dokka\") version \"1.9.10\" apply false\n    java\n}\n";
    assert_eq!(
        scrub(source, Dialect::Kotlin, &rules),
        "plugins {\n    java\n}\n"
    );
}

#[test]
fn test_version_of_kept_plugin_survives() {
    let rules = RuleSet::builder().plugins(["other"]).build();
    let source = "plugins {\n    id 'kept' version '1.0'\n}\n";
    assert_eq!(scrub(source, Dialect::Groovy, &rules), source);
}

#[test]
fn test_alias_plugin_removed() {
    let rules = RuleSet::builder().plugins(["libs.plugins.dokka"]).build();
    let source = "plugins {\n    alias(libs.plugins.dokka)\n    alias(libs.plugins.kotlin)\n}\n";
    assert_eq!(
        scrub(source, Dialect::Kotlin, &rules),
        "plugins {\n    alias(libs.plugins.kotlin)\n}\n"
    );
}

#[test]
fn test_annotation_removed_with_its_call() {
    let rules = RuleSet::builder()
        .plugins(["libs.plugins.dokka"])
        .dialect(Dialect::Kotlin)
        .build();
    let source = "plugins {\n    @Suppress(\"DSL_SCOPE_VIOLATION\")\n    alias(libs.plugins.dokka)\n    java\n}\n";
    assert_eq!(
        scrub(source, Dialect::Kotlin, &rules),
        "plugins {\n    java\n}\n"
    );
}

#[test]
fn test_annotated_block_is_visited_under_groovy_rules() {
    let rules = RuleSet::builder()
        .plugins(["libs.plugins.x"])
        .dialect(Dialect::Groovy)
        .build();
    let source = "@Suppress(\"DSL_SCOPE_VIOLATION\")\nplugins {\n    alias(libs.plugins.x)\n    java\n}\n";
    assert_eq!(
        scrub(source, Dialect::Kotlin, &rules),
        "@Suppress(\"DSL_SCOPE_VIOLATION\")\nplugins {\n    java\n}\n"
    );
}

#[test]
fn test_annotation_removed_with_its_call_under_groovy_rules() {
    let rules = RuleSet::builder()
        .plugins(["libs.plugins.dokka"])
        .dialect(Dialect::Groovy)
        .build();
    let source = "plugins {\n    @Suppress(\"DSL_SCOPE_VIOLATION\")\n    alias(libs.plugins.dokka)\n}\n";
    assert_eq!(scrub(source, Dialect::Kotlin, &rules), "plugins {\n}\n");
}

#[test]
fn test_type_parameter_removes_call() {
    let rules = RuleSet::builder()
        .type_parameters(["KotlinCompile"])
        .dialect(Dialect::Kotlin)
        .build();
    let source = "tasks.withType<KotlinCompile> {\n    kotlinOptions.jvmTarget = \"17\"\n}\ntasks.withType<Test> {\n    useJUnitPlatform()\n}\n";
    assert_eq!(
        scrub(source, Dialect::Kotlin, &rules),
        "tasks.withType<Test> {\n    useJUnitPlatform()\n}\n"
    );
}

#[test]
fn test_method_with_arg_matches_printed_call() {
    let rules = RuleSet::builder()
        .methods_with_arg(["apply(plugin = \"maven-publish\")"])
        .build();
    let source = "apply(plugin = \"maven-publish\")\napply(plugin = \"java\")\n";
    assert_eq!(
        scrub(source, Dialect::Kotlin, &rules),
        "apply(plugin = \"java\")\n"
    );
}

#[test]
fn test_groovy_method_with_arg() {
    let rules = RuleSet::builder()
        .methods_with_arg(["apply plugin: 'signing'"])
        .build();
    let source = "apply plugin: 'java'\napply plugin: 'signing'\n";
    assert_eq!(
        scrub(source, Dialect::Groovy, &rules),
        "apply plugin: 'java'\n"
    );
}

#[test]
fn test_import_removed() {
    let rules = RuleSet::builder().imports(["org.a.Foo"]).build();
    let source = "import org.a.Foo\nimport org.b.Bar\n\nplugins { }\n";
    assert_eq!(
        scrub(source, Dialect::Kotlin, &rules),
        "import org.b.Bar\n\nplugins { }\n"
    );
    let source = "import org.a.Foo\n\nplugins { }\n";
    assert_eq!(scrub(source, Dialect::Groovy, &rules), "plugins { }\n");
}

#[test]
fn test_method_removed_at_every_depth() {
    let rules = RuleSet::builder().methods(["mavenLocal"]).build();
    let source = "repositories {\n    mavenLocal()\n    mavenCentral()\n}\nsubprojects {\n    repositories {\n        mavenLocal()\n    }\n}\n";
    assert_eq!(
        scrub(source, Dialect::Kotlin, &rules),
        "repositories {\n    mavenCentral()\n}\nsubprojects {\n    repositories {\n    }\n}\n"
    );
}

#[test]
fn test_receiver_removal_takes_the_chain() {
    let rules = RuleSet::builder().methods(["publishing"]).build();
    let source = "publishing.publications.create(\"lib\")\nother()\n";
    assert_eq!(scrub(source, Dialect::Kotlin, &rules), source);

    let source = "publishing().publications.clear()\nother()\n";
    assert_eq!(scrub(source, Dialect::Kotlin, &rules), "other()\n");
}

#[test]
fn test_removed_argument_drops_its_separator() {
    let rules = RuleSet::builder().methods(["project"]).build();
    let source = "listOf(project(\":a\"), \"b\")\n";
    assert_eq!(scrub(source, Dialect::Kotlin, &rules), "listOf(\"b\")\n");
}

#[test]
fn test_command_without_arguments_is_removed() {
    let rules = RuleSet::builder().methods(["project"]).build();
    let source = "implementation project(':core')\ncompileOnly 'x:y:1'\n";
    assert_eq!(
        scrub(source, Dialect::Groovy, &rules),
        "compileOnly 'x:y:1'\n"
    );
}

// ---------------------------------------------------------------------------
// Control bodies
// ---------------------------------------------------------------------------

#[test]
fn test_braceless_body_removed_with_its_header() {
    let rules = RuleSet::builder().methods(["signing"]).build();
    let source = "if (release)\n    signing()\nprintln 'always'\n";
    assert_eq!(scrub(source, Dialect::Groovy, &rules), "println 'always'\n");
}

#[test]
fn test_braceless_body_before_else_becomes_empty_block() {
    let rules = RuleSet::builder().methods(["signing"]).build();
    let source = "if (release)\n    signing()\nelse\n    println 'snapshot'\nprintln 'always'\n";
    assert_eq!(
        scrub(source, Dialect::Groovy, &rules),
        "if (release)\n    {}\nelse\n    println 'snapshot'\nprintln 'always'\n"
    );
}

#[test]
fn test_final_else_body_removed_with_its_else() {
    let rules = RuleSet::builder().methods(["signing"]).build();
    let source = "if (isRelease)\n    publish()\nelse\n    signing()\nprintln(\"always\")\n";
    assert_eq!(
        scrub(source, Dialect::Kotlin, &rules),
        "if (isRelease)\n    publish()\nprintln(\"always\")\n"
    );
}

#[test]
fn test_inline_body_before_else_becomes_empty_block() {
    let rules = RuleSet::builder().methods(["signing"]).build();
    let source = "if (c) signing() else println 'x'\n";
    assert_eq!(
        scrub(source, Dialect::Groovy, &rules),
        "if (c) {} else println 'x'\n"
    );
}

// ---------------------------------------------------------------------------
// Guarantees
// ---------------------------------------------------------------------------

#[test]
fn test_empty_rules_change_nothing() {
    let rules = RuleSet::default();
    let source = "plugins {\n    id 'java'\n}\n// trailing\n";
    assert_eq!(scrub(source, Dialect::Groovy, &rules), source);
}

#[test]
fn test_untouched_statements_keep_their_bytes() {
    let rules = RuleSet::builder().methods(["signing"]).build();
    let source = "group   =  'x'   // odd spacing\n\n\nsigning { }\n\n/* keep */ version = '1'\n";
    assert_eq!(
        scrub(source, Dialect::Groovy, &rules),
        "group   =  'x'   // odd spacing\n\n\n/* keep */ version = '1'\n"
    );
}

#[test]
fn test_rewrite_is_idempotent() {
    let rules = RuleSet::builder()
        .plugins(["org.jetbrains.dokka"])
        .methods(["signing"])
        .classpath(["com.x:y:1.0"])
        .imports(["org.a.Foo"])
        .build();
    let source = "import org.a.Foo\n\nplugins {\n    id(\"org.jetbrains.dokka\") version \"1.9.10\"\n    kotlin(\"jvm\")\n}\n\ndependencies {\n    // pinned\n    implementation(\"com.x:y:1.0\")\n    implementation(\"com.x:z:1.0\")\n}\n\nsigning {\n    sign(publishing.publications)\n}\n";
    let once = rewrite(&kotlin(source), &rules);
    let twice = rewrite(&once, &rules);
    assert_eq!(once.print(), twice.print());
    assert_eq!(
        once.print(),
        "plugins {\n    kotlin(\"jvm\")\n}\n\ndependencies {\n    implementation(\"com.x:z:1.0\")\n}\n"
    );
}

#[test]
fn test_removal_count_is_reported() {
    let rules = RuleSet::builder().methods(["a"]).build();
    let script = kotlin("a()\nb { a() }\n");
    let mut visitor = Visitor::new(&rules);
    visitor.visit_script(&script);
    assert_eq!(visitor.removed(), 2);
}

// ---------------------------------------------------------------------------
// Traversal context
// ---------------------------------------------------------------------------

#[test]
fn test_plugin_block_filter_is_scoped() {
    let rules = RuleSet::default();
    let source = "plugins {\n    id 'java'\n}\nid 'java'\n";
    let script = groovy(source);
    let out = Visitor::new(&rules)
        .with_plugin_block_filter(drop_everything)
        .visit_script(&script);
    assert_eq!(out.print(), "plugins {\n}\nid 'java'\n");
}

#[test]
fn test_plugin_block_filter_reaches_nested_blocks() {
    let rules = RuleSet::default();
    let script = groovy("plugins {\n    id 'a'\n}\nallprojects {\n    plugins {\n        id 'b'\n    }\n    apply plugin: 'c'\n}\n");
    let out = Visitor::new(&rules)
        .with_plugin_block_filter(drop_everything)
        .visit_script(&script);
    assert_eq!(
        out.print(),
        "plugins {\n}\nallprojects {\n    plugins {\n    }\n    apply plugin: 'c'\n}\n"
    );
}

#[test]
fn test_default_filter_keeps_plugin_block() {
    let rules = RuleSet::default();
    let source = "plugins {\n    id 'java'\n}\n";
    let out = Visitor::new(&rules).visit_script(&groovy(source));
    assert_eq!(out.print(), source);
}
