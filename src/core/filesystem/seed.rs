//! The demo tree every new session starts with.

use crate::models::{VirtualDirectory, VirtualFile};

/// 2025-01-01T00:00:00Z
const ROOT_MODIFIED: u64 = 1_735_689_600_000;

const PORTFOLIO_JSON: &str = r#"{
  "name": "Genar",
  "role": "Full Stack Developer",
  "skills": ["TypeScript", "React", "Node.js", "Astro", "Rust"],
  "projects": [
    { "name": "Portfolio Site", "tech": ["Astro", "TypeScript"] },
    { "name": "Terminal Interface", "tech": ["Rust", "WebAssembly"] }
  ]
}
"#;

const README_MD: &str = "# Genar's Portfolio

Welcome to my interactive terminal portfolio!

## Available Commands
- `ls` - List files
- `cat <file>` - Read file contents
- `cd <dir>` - Change directory
- `pwd` - Show current directory
- `help` - Show all commands

## About
This is a virtual terminal showcasing my skills and projects.
";

const RESUME_TXT: &str = "GENAR - Full Stack Developer

Experience:
- 5+ years in web development
- Expert in TypeScript/JavaScript
- Strong background in React, Node.js
- Experience with cloud platforms

Education:
- Bachelor's in Computer Science

Contact:
- portfolio@example.com
- github.com/gtrias
";

const COVER_LETTER_TXT: &str = "Dear Hiring Manager,

I am excited to apply for this position...

[Full cover letter content]

Best regards,
Genar
";

const PACKAGE_JSON: &str = r#"{
  "name": "genar-portfolio",
  "version": "1.0.0",
  "scripts": {
    "dev": "astro dev",
    "build": "astro build",
    "preview": "astro preview"
  }
}
"#;

const PORTFOLIO_README: &str = "# Portfolio Site

Built with Astro and TypeScript

## Features
- Terminal interface
- CRT effects
- Boot sequence
- Command system
";

const TERMINAL_RS: &str = "// Terminal implementation
pub struct Terminal;

impl Terminal {
    pub fn execute(&mut self, command: &str) {
        // Execute command
    }
}
";

const INDEX_HTML: &str = "<!DOCTYPE html>
<html>
<head>
  <title>Genar's Portfolio</title>
</head>
<body>
  <h1>Welcome to my portfolio</h1>
</body>
</html>
";

const STYLE_CSS: &str = "body {
  font-family: monospace;
  background: #000;
  color: #0f0;
  margin: 0;
  padding: 20px;
}
";

const BASHRC: &str = r#"# ~/.bashrc: executed by bash(1) for non-login shells.

export PS1="\[\033[01;32m\]\u@\h\[\033[00m\]:\[\033[01;34m\]\w\[\033[00m\]\$ "
"#;

fn documents() -> VirtualDirectory {
    VirtualDirectory::new("Documents")
        .with(VirtualFile::new("resume.txt", RESUME_TXT))
        .with(VirtualFile::new("cover_letter.txt", COVER_LETTER_TXT))
}

fn projects() -> VirtualDirectory {
    VirtualDirectory::new("Projects")
        .with(
            VirtualDirectory::new("portfolio-site")
                .with(VirtualFile::new("package.json", PACKAGE_JSON))
                .with(VirtualFile::new("README.md", PORTFOLIO_README)),
        )
        .with(
            VirtualDirectory::new("terminal-interface")
                .with(VirtualFile::new("terminal.rs", TERMINAL_RS)),
        )
}

fn website() -> VirtualDirectory {
    VirtualDirectory::new("website")
        .with(VirtualFile::new("index.html", INDEX_HTML))
        .with(VirtualFile::new("style.css", STYLE_CSS))
}

fn guest_home() -> VirtualDirectory {
    VirtualDirectory::new("guest")
        .with(VirtualDirectory::new(".config"))
        .with(documents())
        .with(projects())
        .with(website())
        .with(
            VirtualFile::new(
                "awesome_app",
                "#!/bin/bash\n\necho \"Hello from awesome app!\"\necho \"This is a cool portfolio application\"\n",
            )
            .with_permissions("rwxr-xr-x"),
        )
        .with(VirtualFile::new("portfolio.json", PORTFOLIO_JSON))
        .with(VirtualFile::new("README.md", README_MD))
        .with(VirtualFile::new(
            "resume.pdf",
            "%PDF-1.4\n%Fake PDF content for display purposes\n",
        ))
        .with(VirtualFile::new(
            "todo.txt",
            "- Finish portfolio terminal\n- Add more interactive features\n- Implement easter eggs\n- Write blog posts\n",
        ))
        .with(VirtualFile::new(
            ".bash_logout",
            "# ~/.bash_logout: executed by bash(1) when login shell exits.\n",
        ))
        .with(VirtualFile::new(".bashrc", BASHRC))
        .with(VirtualFile::new(
            ".profile",
            "# ~/.profile: executed by the command interpreter for login shells.\n",
        ))
        .with(
            VirtualFile::new(
                ".secret_projects",
                "TOP SECRET PROJECTS:\n1. AI-powered coffee maker\n2. Time-traveling debugger\n3. Self-writing code generator\n",
            )
            .with_permissions("rw-------"),
        )
}

pub(super) fn seed_root() -> VirtualDirectory {
    let mut root = VirtualDirectory::new("/")
        .with(VirtualDirectory::new("home").with(guest_home()))
        .with(VirtualDirectory::new("tmp"))
        .with(VirtualDirectory::new("usr").with(VirtualDirectory::new("bin")))
        .with(VirtualDirectory::new("bin"));
    root.modified = ROOT_MODIFIED;
    root
}
