//! Filesystem commands: `ls`, `cat`, `cd`, `pwd`, `touch`, `mkdir`.

use std::cell::RefCell;
use std::rc::Rc;

use super::{Command, CommandContext, CommandResult, EXIT_FAILURE, EXIT_SUCCESS, Handler};
use crate::config;
use crate::core::filesystem::VirtualFileSystem;
use crate::models::{Category, VirtualNode};
use crate::utils::ansi::{BRIGHT_BLUE, BRIGHT_GREEN, BRIGHT_RED, GRAY, paint};
use crate::utils::format::format_listing_date;

pub(super) fn commands() -> Vec<Command> {
    vec![
        Command {
            name: "ls",
            description: "List directory contents",
            usage: Some("ls [-la|-a|-l] [path]"),
            category: Category::System,
            handler: Handler::Sync(ls),
        },
        Command {
            name: "cat",
            description: "Read and display file contents",
            usage: Some("cat <file>"),
            category: Category::System,
            handler: Handler::Sync(cat),
        },
        Command {
            name: "cd",
            description: "Change current directory",
            usage: Some("cd [directory]"),
            category: Category::System,
            handler: Handler::Sync(cd),
        },
        Command {
            name: "pwd",
            description: "Print working directory",
            usage: Some("pwd"),
            category: Category::System,
            handler: Handler::Sync(pwd),
        },
        Command {
            name: "touch",
            description: "Create empty file",
            usage: Some("touch <file>"),
            category: Category::System,
            handler: Handler::Sync(touch),
        },
        Command {
            name: "mkdir",
            description: "Create directory",
            usage: Some("mkdir <directory>"),
            category: Category::System,
            handler: Handler::Sync(mkdir),
        },
    ]
}

// =============================================================================
// Helpers
// =============================================================================

fn error(ctx: &CommandContext, message: &str) -> CommandResult {
    ctx.writeln(&paint(BRIGHT_RED, message));
    Ok(EXIT_FAILURE)
}

fn missing_operand(ctx: &CommandContext, message: &str, usage: &str) -> CommandResult {
    ctx.writeln(&paint(BRIGHT_RED, message));
    ctx.writeln(&paint(GRAY, &format!("Usage: {}", usage)));
    Ok(EXIT_FAILURE)
}

fn require_fs(ctx: &CommandContext, command: &str) -> Option<Rc<RefCell<VirtualFileSystem>>> {
    let fs = ctx.filesystem();
    if fs.is_none() {
        ctx.writeln(&paint(BRIGHT_RED, &format!("{}: file system not available", command)));
    }
    fs
}

/// The session's home directory.
fn home_dir(ctx: &CommandContext) -> String {
    ctx.shell()
        .map(|shell| shell.borrow().env().home().to_string())
        .unwrap_or_else(|| config::HOME_DIR.to_string())
}

fn user_name(ctx: &CommandContext) -> String {
    ctx.shell()
        .map(|shell| shell.borrow().env().user().to_string())
        .unwrap_or_else(|| config::USER.to_string())
}

/// Replace a leading `~` with the home directory.
fn expand_tilde(path: &str, home: &str) -> String {
    match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => format!("{}{}", home, rest),
        _ => path.to_string(),
    }
}

fn resolve(ctx: &CommandContext, fs: &VirtualFileSystem, path: &str) -> Vec<String> {
    fs.resolve_path(&expand_tilde(path, &home_dir(ctx)))
}

// =============================================================================
// ls
// =============================================================================

#[derive(Default)]
struct LsOptions {
    all: bool,
    long: bool,
    path: Option<String>,
}

fn parse_ls_args(args: &[String]) -> Result<LsOptions, char> {
    let mut opts = LsOptions::default();
    for arg in args {
        match arg.strip_prefix('-') {
            Some(flags) if !flags.is_empty() => {
                for flag in flags.chars() {
                    match flag {
                        'a' => opts.all = true,
                        'l' => opts.long = true,
                        other => return Err(other),
                    }
                }
            }
            _ => {
                if opts.path.is_none() {
                    opts.path = Some(arg.clone());
                }
            }
        }
    }
    Ok(opts)
}

fn name_color(node: &VirtualNode) -> Option<&'static str> {
    if node.is_dir() {
        Some(BRIGHT_BLUE)
    } else if node.is_executable() {
        Some(BRIGHT_GREEN)
    } else {
        None
    }
}

fn colored_name(node: &VirtualNode, name: &str) -> String {
    match name_color(node) {
        Some(color) => paint(color, name),
        None => name.to_string(),
    }
}

fn long_entry(node: &VirtualNode, name: &str, user: &str) -> String {
    let links = match node.as_dir() {
        Some(dir) => 2 + dir.children.values().filter(|c| c.is_dir()).count(),
        None => 1,
    };
    let mode_color = name_color(node).unwrap_or(GRAY);
    format!(
        "{}{:>4} {}  {} {:>6} {} {}",
        paint(mode_color, &node.mode_string()),
        links,
        user,
        user,
        node.size(),
        format_listing_date(node.modified()),
        colored_name(node, name),
    )
}

/// Names laid out in columns across the screen width.
fn grid(entries: &[&VirtualNode]) -> Vec<String> {
    let width = entries.iter().map(|e| e.name().chars().count()).max().unwrap_or(0) + 2;
    let per_row = (config::screen::COLS / width).max(1);

    entries
        .chunks(per_row)
        .map(|row| {
            let mut line = String::new();
            for (i, node) in row.iter().enumerate() {
                line.push_str(&colored_name(node, node.name()));
                if i + 1 < row.len() {
                    let pad = width - node.name().chars().count();
                    line.push_str(&" ".repeat(pad));
                }
            }
            line
        })
        .collect()
}

fn ls(ctx: &CommandContext) -> CommandResult {
    let opts = match parse_ls_args(&ctx.args) {
        Ok(opts) => opts,
        Err(flag) => {
            ctx.writeln(&paint(BRIGHT_RED, &format!("ls: invalid option -- '{}'", flag)));
            ctx.writeln(&paint(GRAY, "Usage: ls [-la|-a|-l] [path]"));
            return Ok(EXIT_FAILURE);
        }
    };
    let Some(fs) = require_fs(ctx, "ls") else {
        return Ok(EXIT_FAILURE);
    };
    let fs = fs.borrow();

    let target = match &opts.path {
        Some(path) => resolve(ctx, &fs, path),
        None => fs.current_path().to_vec(),
    };
    let Some(node) = fs.get_node(&target) else {
        let shown = opts.path.as_deref().unwrap_or(".");
        return error(
            ctx,
            &format!("ls: cannot access '{}': No such file or directory", shown),
        );
    };

    let user = user_name(ctx);
    ctx.writeln("");

    if !node.is_dir() {
        let name = opts.path.as_deref().unwrap_or(node.name());
        if opts.long {
            ctx.writeln(&long_entry(node, name, &user));
        } else {
            ctx.writeln(&colored_name(node, name));
        }
        ctx.writeln("");
        return Ok(EXIT_SUCCESS);
    }

    let entries: Vec<&VirtualNode> = fs
        .list_directory(Some(&target))
        .unwrap_or_default()
        .into_iter()
        .filter(|n| opts.all || !n.name().starts_with('.'))
        .collect();

    if opts.long {
        let blocks: usize = entries.iter().map(|e| e.size().div_ceil(1024)).sum();
        ctx.writeln(&paint(GRAY, &format!("total {}", blocks)));
        if opts.all {
            ctx.writeln(&long_entry(node, ".", &user));
            let parent = &target[..target.len().saturating_sub(1)];
            if let Some(parent) = fs.get_node(parent) {
                ctx.writeln(&long_entry(parent, "..", &user));
            }
        }
        for entry in &entries {
            ctx.writeln(&long_entry(entry, entry.name(), &user));
        }
    } else {
        for line in grid(&entries) {
            ctx.writeln(&line);
        }
    }
    ctx.writeln("");
    Ok(EXIT_SUCCESS)
}

// =============================================================================
// cat / cd / pwd
// =============================================================================

fn cat(ctx: &CommandContext) -> CommandResult {
    if ctx.args.is_empty() {
        return missing_operand(ctx, "cat: missing file operand", "cat <file>");
    }
    let Some(fs) = require_fs(ctx, "cat") else {
        return Ok(EXIT_FAILURE);
    };
    let fs = fs.borrow();

    let mut code = EXIT_SUCCESS;
    for arg in &ctx.args {
        let path = resolve(ctx, &fs, arg);
        match fs.get_node(&path) {
            Some(VirtualNode::File(file)) => {
                for line in file.content.lines() {
                    ctx.writeln(line);
                }
            }
            Some(VirtualNode::Directory(_)) => {
                ctx.writeln(&paint(BRIGHT_RED, &format!("cat: {}: Is a directory", arg)));
                code = EXIT_FAILURE;
            }
            None => {
                ctx.writeln(&paint(
                    BRIGHT_RED,
                    &format!("cat: {}: No such file or directory", arg),
                ));
                code = EXIT_FAILURE;
            }
        }
    }
    Ok(code)
}

fn cd(ctx: &CommandContext) -> CommandResult {
    let Some(fs) = require_fs(ctx, "cd") else {
        return Ok(EXIT_FAILURE);
    };
    let home = home_dir(ctx);
    let target = ctx.arg(0).unwrap_or(&home).to_string();
    let segments = fs.borrow().resolve_path(&expand_tilde(&target, &home));

    let changed = match ctx.shell() {
        Some(shell) => shell.borrow_mut().change_directory(&segments),
        None => fs.borrow_mut().set_current_path(&segments),
    };
    if changed {
        return Ok(EXIT_SUCCESS);
    }

    let is_file = fs.borrow().get_node(&segments).is_some();
    let reason = if is_file {
        "Not a directory"
    } else {
        "No such file or directory"
    };
    error(ctx, &format!("cd: {}: {}", target, reason))
}

fn pwd(ctx: &CommandContext) -> CommandResult {
    let Some(fs) = require_fs(ctx, "pwd") else {
        return Ok(EXIT_FAILURE);
    };
    ctx.writeln(&fs.borrow().current_path_string());
    Ok(EXIT_SUCCESS)
}

// =============================================================================
// touch / mkdir
// =============================================================================

fn touch(ctx: &CommandContext) -> CommandResult {
    if ctx.args.is_empty() {
        return missing_operand(ctx, "touch: missing file operand", "touch <file>");
    }
    let Some(fs) = require_fs(ctx, "touch") else {
        return Ok(EXIT_FAILURE);
    };

    let mut code = EXIT_SUCCESS;
    for arg in &ctx.args {
        let path = resolve(ctx, &fs.borrow(), arg);
        let mut fs = fs.borrow_mut();
        if fs.touch(&path) || fs.create_file_at_path(&path, "") {
            continue;
        }
        drop(fs);
        ctx.writeln(&paint(
            BRIGHT_RED,
            &format!("touch: {}: No such file or directory", arg),
        ));
        code = EXIT_FAILURE;
    }
    Ok(code)
}

fn mkdir(ctx: &CommandContext) -> CommandResult {
    if ctx.args.is_empty() {
        return missing_operand(ctx, "mkdir: missing directory operand", "mkdir <directory>");
    }
    let Some(fs) = require_fs(ctx, "mkdir") else {
        return Ok(EXIT_FAILURE);
    };

    let mut code = EXIT_SUCCESS;
    for arg in &ctx.args {
        let path = resolve(ctx, &fs.borrow(), arg);
        if fs.borrow_mut().create_directory_at_path(&path) {
            continue;
        }
        ctx.writeln(&paint(
            BRIGHT_RED,
            &format!("mkdir: {}: File already exists or invalid path", arg),
        ));
        code = EXIT_FAILURE;
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::handler::testing::Harness;

    fn segs(path: &str) -> Vec<String> {
        path.split('/')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_ls_args() {
        let args = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let opts = parse_ls_args(&args(&["-la", "Documents"])).unwrap();
        assert!(opts.all && opts.long);
        assert_eq!(opts.path.as_deref(), Some("Documents"));

        let opts = parse_ls_args(&args(&["-a", "-l"])).unwrap();
        assert!(opts.all && opts.long);
        assert_eq!(parse_ls_args(&args(&["-x"])).err(), Some('x'));
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("~", "/home/guest"), "/home/guest");
        assert_eq!(expand_tilde("~/Documents", "/home/guest"), "/home/guest/Documents");
        assert_eq!(expand_tilde("~other", "/home/guest"), "~other");
        assert_eq!(expand_tilde("a~", "/home/guest"), "a~");
    }

    #[tokio::test]
    async fn test_ls_hides_dotfiles() {
        let h = Harness::new();
        let (code, out) = h.run("ls").await;
        assert_eq!(code, EXIT_SUCCESS);
        assert!(out.contains("Documents"));
        assert!(out.contains("todo.txt"));
        assert!(!out.contains(".bashrc"));
        let docs = out.find("Documents").unwrap();
        let readme = out.find("README.md").unwrap();
        assert!(docs < readme);
    }

    #[tokio::test]
    async fn test_ls_colors_directories_and_executables() {
        let h = Harness::new();
        h.run("ls").await;
        let raw = h.term.output();
        assert!(raw.contains("\x1b[94mDocuments\x1b[0m"));
        assert!(raw.contains("\x1b[92mawesome_app\x1b[0m"));
    }

    #[tokio::test]
    async fn test_ls_long_all() {
        let h = Harness::new();
        let (code, out) = h.run("ls -la").await;
        assert_eq!(code, EXIT_SUCCESS);
        let lines: Vec<&str> = out.split("\r\n").collect();
        assert!(lines[1].starts_with("total "));
        assert!(lines[2].starts_with("drwxr-xr-x") && lines[2].ends_with(" ."));
        assert!(lines[3].ends_with(" .."));
        assert!(out.contains(".secret_projects"));
        let secret = lines.iter().find(|l| l.ends_with(".secret_projects")).unwrap();
        assert!(secret.starts_with("-rw-------"));
        assert!(secret.contains("guest  guest"));
    }

    #[tokio::test]
    async fn test_ll_alias_runs_long_listing() {
        let h = Harness::new();
        let (_, out) = h.run("ll").await;
        assert!(out.contains(" .bashrc"));
        assert!(out.contains("total "));
    }

    #[tokio::test]
    async fn test_ls_other_directory_and_errors() {
        let h = Harness::new();
        let (code, out) = h.run("ls Documents").await;
        assert_eq!(code, EXIT_SUCCESS);
        assert!(out.contains("cover_letter.txt"));
        assert!(out.contains("resume.txt"));

        let (code, out) = h.run("ls nowhere").await;
        assert_eq!(code, EXIT_FAILURE);
        assert!(out.contains("ls: cannot access 'nowhere': No such file or directory"));

        let (code, out) = h.run("ls -z").await;
        assert_eq!(code, EXIT_FAILURE);
        assert!(out.contains("ls: invalid option -- 'z'"));
    }

    #[tokio::test]
    async fn test_cat() {
        let h = Harness::new();
        let (code, out) = h.run("cat todo.txt").await;
        assert_eq!(code, EXIT_SUCCESS);
        assert!(out.starts_with("- Finish portfolio terminal\r\n"));

        let (code, out) = h.run("cat").await;
        assert_eq!(code, EXIT_FAILURE);
        assert_eq!(out, "cat: missing file operand\r\nUsage: cat <file>\r\n");

        let (_, out) = h.run("cat Documents").await;
        assert_eq!(out, "cat: Documents: Is a directory\r\n");

        let (_, out) = h.run("cat ghost.txt").await;
        assert_eq!(out, "cat: ghost.txt: No such file or directory\r\n");

        let (code, _) = h.run("cat ~/Documents/resume.txt").await;
        assert_eq!(code, EXIT_SUCCESS);
    }

    #[tokio::test]
    async fn test_cd_and_pwd() {
        let h = Harness::new();
        assert_eq!(h.run("cd Projects").await.0, EXIT_SUCCESS);
        assert_eq!(h.run("pwd").await.1, "/home/guest/Projects\r\n");
        assert_eq!(h.shell.borrow().env().pwd(), "/home/guest/Projects");

        h.run("cd ../..").await;
        assert_eq!(h.run("pwd").await.1, "/home\r\n");

        h.run("cd").await;
        assert_eq!(h.fs.borrow().current_path_string(), "/home/guest");

        h.run("cd /").await;
        h.run("cd ~").await;
        assert_eq!(h.fs.borrow().current_path_string(), "/home/guest");
    }

    #[tokio::test]
    async fn test_cd_errors() {
        let h = Harness::new();
        let (code, out) = h.run("cd nowhere").await;
        assert_eq!(code, EXIT_FAILURE);
        assert_eq!(out, "cd: nowhere: No such file or directory\r\n");

        let (_, out) = h.run("cd todo.txt").await;
        assert_eq!(out, "cd: todo.txt: Not a directory\r\n");
        assert_eq!(h.fs.borrow().current_path_string(), "/home/guest");
    }

    #[tokio::test]
    async fn test_touch_and_mkdir() {
        let h = Harness::new();
        assert_eq!(h.run("mkdir notes").await.0, EXIT_SUCCESS);
        assert_eq!(h.run("touch notes/a.txt notes/b.txt").await.0, EXIT_SUCCESS);
        assert_eq!(h.fs.borrow().read_file(&segs("/home/guest/notes/a.txt")), Some(""));
        assert!(h.fs.borrow().get_node(&segs("/home/guest/notes/b.txt")).is_some());

        let (code, out) = h.run("mkdir notes").await;
        assert_eq!(code, EXIT_FAILURE);
        assert_eq!(out, "mkdir: notes: File already exists or invalid path\r\n");

        let (code, out) = h.run("touch missing/x").await;
        assert_eq!(code, EXIT_FAILURE);
        assert_eq!(out, "touch: missing/x: No such file or directory\r\n");

        let (_, out) = h.run("mkdir").await;
        assert_eq!(out, "mkdir: missing directory operand\r\nUsage: mkdir <directory>\r\n");
        let (_, out) = h.run("touch").await;
        assert_eq!(out, "touch: missing file operand\r\nUsage: touch <file>\r\n");
    }

    #[tokio::test]
    async fn test_touch_existing_keeps_content() {
        let h = Harness::new();
        assert_eq!(h.run("touch todo.txt").await.0, EXIT_SUCCESS);
        assert!(
            h.fs.borrow()
                .read_file(&segs("/home/guest/todo.txt"))
                .is_some_and(|c| c.starts_with("- Finish"))
        );
    }
}
