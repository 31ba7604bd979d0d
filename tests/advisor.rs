mod common;

use common::Scenario;

const NOTE: &str = "parameter type is not trivial";

#[test]
fn test_record_parameter_in_user_file() {
    let report = Scenario::new("one record parameter")
        .path("a.c")
        .source(
            r#"
struct S { int a; };

void f(struct S s) { }
"#,
        )
        .run();

    report.assert_clean().assert_note_count(1).assert_note_at("a.c", 3);
    assert_eq!(report.notes[0].message, NOTE);
    assert_eq!(report.notes[0].column, 17);
    assert_eq!(report.notes[0].context.as_deref(), Some("f"));
}

#[test]
fn test_note_only_for_the_record_parameter() {
    let report = Scenario::new("mixed parameters")
        .path("a.c")
        .source(
            r#"
struct S { int a; };

int g(int x, struct S s) { return 0; }
"#,
        )
        .run();

    report.assert_clean().assert_note_count(1).assert_note_at("a.c", 3);
}

#[test]
fn test_system_header_path_suppresses_notes() {
    let report = Scenario::new("declared in a system header")
        .path("/usr/include/stdlib.h")
        .source("struct S { int a; };\nstruct S h(struct S s) { return s; }\n")
        .run();

    report.assert_clean().assert_no_notes();
}

#[test]
fn test_usr_src_debug_is_treated_as_user_code() {
    let report = Scenario::new("debuginfo sources are user code")
        .path("/usr/src/debug/foo.c")
        .source("struct S { int a; };\nvoid f(struct S s) { }\n")
        .run();

    report.assert_clean().assert_note_count(1);
}

#[test]
fn test_zero_parameters_zero_notes() {
    let report = Scenario::new("no parameters")
        .path("a.c")
        .source("void f(void) { }\nint main(void) { return 0; }\n")
        .run();

    report.assert_clean().assert_no_notes();
}

#[test]
fn test_pointer_to_record_is_trivial() {
    let report = Scenario::new("pointer parameter")
        .path("a.c")
        .source("struct S { int a; };\nvoid f(struct S *s) { }\n")
        .run();

    report.assert_clean().assert_no_notes();
}

#[test]
fn test_union_parameter_is_not_trivial() {
    let report = Scenario::new("union parameter")
        .path("a.c")
        .source("union U { int a; float b; };\nvoid f(union U u) { }\n")
        .run();

    report.assert_clean().assert_note_count(1);
}

#[test]
fn test_prototypes_never_enter_the_pipeline() {
    let report = Scenario::new("prototype only")
        .path("a.c")
        .source("struct S { int a; };\nvoid f(struct S s);\n")
        .run();

    report.assert_clean().assert_no_notes();
}

#[test]
fn test_typedef_name_is_not_resolved() {
    let report = Scenario::new("typedef parameter")
        .path("a.c")
        .source("typedef struct S { int a; } point_t;\nvoid f(point_t p) { }\n")
        .run();

    report.assert_clean().assert_no_notes();
}

#[test]
fn test_array_parameter_decays() {
    let report = Scenario::new("array parameter")
        .path("a.c")
        .source("struct S { int a; };\nvoid f(struct S s[4]) { }\n")
        .run();

    report.assert_clean().assert_no_notes();
}

#[test]
fn test_variadic_definition_still_noted() {
    let report = Scenario::new("variadic function")
        .path("a.c")
        .source("struct S { int a; };\nint f(struct S s, ...) { return 0; }\n")
        .run();

    report.assert_clean().assert_note_count(1);
}

#[test]
fn test_linemarker_system_header_flag() {
    let report = Scenario::new("preprocessed unit with system header")
        .path("tu.i")
        .source(
            r#"
# 1 "a.c"
# 1 "/usr/include/sys.h" 1 3
struct S { int a; };
void sysfn(struct S s) { }
# 5 "a.c" 2
void userfn(struct S s) { }
"#,
        )
        .run();

    report.assert_clean().assert_note_count(1).assert_note_at("a.c", 5);
    assert_eq!(report.notes[0].context.as_deref(), Some("userfn"));
}

#[test]
fn test_linemarker_flag_beats_path_heuristic() {
    // The marker names a /usr path but carries no system-header flag, so
    // the verdict comes from the flag, not the prefix.
    let report = Scenario::new("flag used verbatim")
        .path("tu.i")
        .source(
            r#"
# 1 "/usr/weird/gen.c"
struct S { int a; };
void f(struct S s) { }
"#,
        )
        .run();

    report.assert_clean().assert_note_count(1);
    assert_eq!(
        report.notes[0].file,
        std::path::PathBuf::from("/usr/weird/gen.c")
    );
}

#[test]
fn test_missing_return_warning() {
    let report = Scenario::new("non-void function without return")
        .path("a.c")
        .source("int f(int x) { }\n")
        .run();

    report
        .assert_clean()
        .assert_warning("control reaches end of non-void function");
}

#[test]
fn test_void_and_returning_functions_do_not_warn() {
    let report = Scenario::new("void and returning functions")
        .path("a.c")
        .source("void f(void) { }\nint g(void) { return 1; }\nint h(void);\n")
        .run();

    report.assert_clean().assert_no_warnings();
}

#[test]
fn test_function_context_announced_once() {
    let report = Scenario::new("two record parameters")
        .path("a.c")
        .source("struct S { int a; };\nvoid f(struct S a, struct S b) { }\n")
        .run();

    report.assert_clean().assert_note_count(2);
    assert_eq!(report.notes[0].context.as_deref(), Some("f"));
    assert_eq!(report.notes[1].context.as_deref(), None);
}

#[test]
fn test_notes_attributed_per_function() {
    let report = Scenario::new("two functions")
        .path("a.c")
        .source(
            r#"
struct S { int a; };

void f(struct S s) { }

void g(int x) { }

void h(struct S s) { }
"#,
        )
        .run();

    report.assert_clean().assert_note_count(2);
    assert_eq!(report.notes[0].context.as_deref(), Some("f"));
    assert_eq!(report.notes[1].context.as_deref(), Some("h"));
}
