//! Seed data for first run and reset

use crate::models::{new_id, Category, Link};

/// (id, name, icon) for each seed category, in display order
const CATEGORIES: &[(&str, &str, &str)] = &[
    ("common-tools", "Tools", "ToolOutlined"),
    ("react", "React", "CodeOutlined"),
    ("vue", "Vue", "CodepenOutlined"),
    ("node", "Node", "CloudServerOutlined"),
    ("build-tools", "Build Tools", "BuildOutlined"),
    ("css", "CSS", "BgColorsOutlined"),
    ("community", "Community", "TeamOutlined"),
    ("code-hosting", "Code Hosting", "GithubOutlined"),
    ("hosting", "Site Hosting", "CloudOutlined"),
];

/// (name, url, description, category) for each seed link
const LINKS: &[(&str, &str, &str, &str)] = &[
    ("Can I use", "https://caniuse.com", "Browser support tables for front-end APIs", "Tools"),
    ("TinyPNG", "https://tinypng.com", "Online image compression", "Tools"),
    ("AST Explorer", "https://astexplorer.net/", "Explore syntax trees produced by many parsers", "Tools"),
    ("transform", "https://transform.tools", "Convert between data formats and types", "Tools"),
    ("Hoppscotch", "https://hoppscotch.io/", "Open source API development ecosystem", "Tools"),
    ("React", "https://react.dev", "The library for web and native user interfaces", "React"),
    ("React Router", "https://reactrouter.com", "Declarative routing for React", "React"),
    ("Next.js", "https://nextjs.org", "The React framework for the web", "React"),
    ("Redux", "https://redux.js.org", "A predictable state container for JavaScript apps", "React"),
    ("Zustand", "https://zustand.docs.pmnd.rs", "Small, fast and scalable state management", "React"),
    ("Vue", "https://vuejs.org", "The progressive JavaScript framework", "Vue"),
    ("Pinia", "https://pinia.vuejs.org", "Intuitive state management for Vue", "Vue"),
    ("Nuxt", "https://nuxt.com", "The intuitive Vue framework", "Vue"),
    ("VueUse", "https://vueuse.org", "Collection of Vue composition utilities", "Vue"),
    ("Node.js", "https://nodejs.org", "JavaScript runtime built on V8", "Node"),
    ("Deno", "https://deno.com/", "Open-source JavaScript runtime for the modern web", "Node"),
    ("Express", "https://expressjs.com", "Fast, minimalist web framework for Node.js", "Node"),
    ("npm", "https://www.npmjs.com", "The package registry for JavaScript", "Node"),
    ("pnpm", "https://pnpm.io", "Fast, disk space efficient package manager", "Node"),
    ("Vite", "https://vitejs.dev", "Next generation frontend tooling", "Build Tools"),
    ("Webpack", "https://webpack.js.org", "Static module bundler for JavaScript", "Build Tools"),
    ("esbuild", "https://esbuild.github.io", "An extremely fast bundler for the web", "Build Tools"),
    ("SWC", "https://swc.rs", "Rust-based platform for the web", "Build Tools"),
    ("Tailwind CSS", "https://tailwindcss.com", "Utility-first CSS framework", "CSS"),
    ("Sass", "https://sass-lang.com", "CSS with superpowers", "CSS"),
    ("PostCSS", "https://postcss.org", "Transform CSS with JavaScript", "CSS"),
    ("Stack Overflow", "https://stackoverflow.com", "Questions and answers for developers", "Community"),
    ("V2EX", "https://www.v2ex.com", "A place for sharing and exploring", "Community"),
    ("GitHub", "https://github.com", "Hosting for open source and private projects", "Code Hosting"),
    ("GitLab", "https://gitlab.com/", "Ship secure code faster", "Code Hosting"),
    ("Vercel", "https://vercel.com", "Frontend cloud for deploying web apps", "Site Hosting"),
    ("Netlify", "https://www.netlify.com", "Platform for static sites and web apps", "Site Hosting"),
];

/// Background color for seed link icons
const DEFAULT_BACKGROUND: &str = "#1890ff";

/// Name of the category selected on first run
pub fn default_category_name() -> &'static str {
    CATEGORIES[0].1
}

pub fn default_categories(now: i64) -> Vec<Category> {
    CATEGORIES
        .iter()
        .enumerate()
        .map(|(order, (id, name, icon))| Category {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            order,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

pub fn default_links(now: i64) -> Vec<Link> {
    LINKS
        .iter()
        .enumerate()
        .map(|(order, (name, url, description, category))| Link {
            id: new_id(),
            name: name.to_string(),
            url: url.to_string(),
            description: description.to_string(),
            icon: None,
            background_color: Some(DEFAULT_BACKGROUND.to_string()),
            icon_scale: None,
            category: Some(category.to_string()),
            tags: Vec::new(),
            order,
            created_at: now,
            updated_at: now,
        })
        .collect()
}
