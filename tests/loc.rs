use mapper::loc::{count_lines, find_source_files, language_for, scan, CommentStyle, LineCounts};

fn counts(total: usize, code: usize, comment: usize, blank: usize) -> LineCounts {
    LineCounts { total, code, comment, blank }
}

#[test]
fn test_c_style_lines() {
    let src = "\
// header
fn main() {

    /* one-liner */
    let x = 1; /* trailing */
    /*
     * block
     */
    x + 1 // trailing line comment
}
";
    assert_eq!(count_lines(src, CommentStyle::C), counts(10, 4, 5, 1));
}

#[test]
fn test_code_before_block_open_counts_as_code() {
    let src = "int a; /* starts\nstill comment\nends */\nint b;\n";
    assert_eq!(count_lines(src, CommentStyle::C), counts(4, 2, 2, 0));
}

#[test]
fn test_hash_style_has_no_block_comments() {
    let src = "#!/bin/sh\n# comment\necho hi\n\n/* not a comment */\n";
    assert_eq!(count_lines(src, CommentStyle::Hash), counts(5, 2, 2, 1));
}

#[test]
fn test_lua_block_comments() {
    let src = "--[[\nblock\n]]\n-- line\nprint(1)\n";
    assert_eq!(count_lines(src, CommentStyle::Lua), counts(5, 1, 4, 0));
}

#[test]
fn test_html_comments() {
    let src = "<!-- a -->\n<p>hi</p>\n<!--\nmulti\n-->\n";
    assert_eq!(count_lines(src, CommentStyle::Html), counts(5, 1, 4, 0));
}

#[test]
fn test_language_table() {
    assert_eq!(language_for("rs"), Some(CommentStyle::C));
    assert_eq!(language_for("py"), Some(CommentStyle::Hash));
    assert_eq!(language_for("sql"), Some(CommentStyle::Sql));
    assert_eq!(language_for("hs"), Some(CommentStyle::Haskell));
    assert_eq!(language_for("scss"), Some(CommentStyle::Css));
    assert_eq!(language_for("md"), None);
}

#[test]
fn test_scan_skips_ignored_directories() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::create_dir_all(root.join("target/debug")).unwrap();
    std::fs::create_dir_all(root.join(".hidden")).unwrap();
    std::fs::write(root.join("src/main.rs"), "// hi\nfn main() {}\n\n").unwrap();
    std::fs::write(root.join("src/tool.py"), "print(1)\nprint(2)\n# done\n").unwrap();
    std::fs::write(root.join("target/debug/gen.rs"), "fn gen() {}\n").unwrap();
    std::fs::write(root.join(".hidden/x.rs"), "fn x() {}\n").unwrap();
    std::fs::write(root.join("README.md"), "# title\n").unwrap();

    let files = find_source_files(root);
    assert_eq!(files.len(), 2);

    let report = scan(root);
    assert_eq!(report.files, 2);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.totals, counts(6, 3, 2, 1));
    assert_eq!(report.by_ext["rs"].counts, counts(3, 1, 1, 1));
    assert_eq!(report.by_ext["py"].files, 1);

    let table = report.render(root);
    let py_row = table.find("\n.py ").unwrap();
    let rs_row = table.find("\n.rs ").unwrap();
    assert!(py_row < rs_row, "rows are sorted by code lines, descending");
    assert!(table.contains("TOTAL"));
    assert!(table.contains("(50.0%)"));
}

#[test]
fn test_scan_of_dot_named_root_still_descends() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join(".project");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("lib.rs"), "fn f() {}\n").unwrap();
    assert_eq!(scan(&root).files, 1);
}
