use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use course_core::model::{Affordance, Course, CourseId, LessonId};
use services::{AppServices, LessonLookup, SearchOutcome, StaticResourceTable, SubjectFilter};
use storage::catalog::{CourseCatalog, InMemoryCatalog};
use tracing_subscriber::EnvFilter;

const DEMO_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { what: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidId { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { what } => write!(f, "missing {what}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidId { raw } => write!(f, "invalid id: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [options] home");
    eprintln!("  cargo run -p app -- [options] courses [--subject <name>]");
    eprintln!("  cargo run -p app -- [options] course <course-id>");
    eprintln!("  cargo run -p app -- [options] lesson <course-id> <lesson-id>");
    eprintln!("  cargo run -p app -- [options] search <query...>");
    eprintln!("  cargo run -p app -- [options] complete|uncomplete|toggle <lesson-id>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>       progress database (default: sqlite:progress.sqlite3)");
    eprintln!("  --catalog <path>        catalog JSON (default: bundled demo catalog)");
    eprintln!("  --resources <path>      static resource table JSON (default: bundled table)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LEARN_DB_URL, LEARN_CATALOG_PATH, LEARN_STATIC_RESOURCES, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Home,
    Courses { subject: SubjectFilter },
    Course { id: CourseId },
    Lesson { course: CourseId, lesson: LessonId },
    Search { query: String },
    Complete { lesson: LessonId },
    Uncomplete { lesson: LessonId },
    Toggle { lesson: LessonId },
}

struct Args {
    db_url: String,
    catalog_path: Option<PathBuf>,
    resources_path: Option<PathBuf>,
    command: Command,
}

fn parse_id<T: std::str::FromStr>(raw: Option<&String>, what: &'static str) -> Result<T, ArgsError> {
    let raw = raw.ok_or(ArgsError::MissingArgument { what })?;
    raw.parse()
        .map_err(|_| ArgsError::InvalidId { raw: raw.clone() })
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut db_url = std::env::var("LEARN_DB_URL")
            .ok()
            .map_or_else(|| normalize_sqlite_url("sqlite:progress.sqlite3".into()), normalize_sqlite_url);
        let mut catalog_path = std::env::var_os("LEARN_CATALOG_PATH").map(PathBuf::from);
        let mut resources_path = std::env::var_os("LEARN_STATIC_RESOURCES").map(PathBuf::from);
        let mut subject = SubjectFilter::All;
        let mut positional = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--catalog" => catalog_path = Some(require_value(args, "--catalog")?.into()),
                "--resources" => resources_path = Some(require_value(args, "--resources")?.into()),
                "--subject" => subject = SubjectFilter::from_label(&require_value(args, "--subject")?),
                "--help" | "-h" => return Ok(None),
                _ if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => positional.push(arg),
            }
        }

        let mut rest = positional.iter();
        let command = match rest.next().map(String::as_str) {
            Some("home") => Command::Home,
            None | Some("courses") => Command::Courses { subject },
            Some("course") => Command::Course {
                id: parse_id(rest.next(), "course id")?,
            },
            Some("lesson") => Command::Lesson {
                course: parse_id(rest.next(), "course id")?,
                lesson: parse_id(rest.next(), "lesson id")?,
            },
            Some("search") => Command::Search {
                query: rest.map(String::as_str).collect::<Vec<_>>().join(" "),
            },
            Some("complete") => Command::Complete {
                lesson: parse_id(rest.next(), "lesson id")?,
            },
            Some("uncomplete") => Command::Uncomplete {
                lesson: parse_id(rest.next(), "lesson id")?,
            },
            Some("toggle") => Command::Toggle {
                lesson: parse_id(rest.next(), "lesson id")?,
            },
            Some(other) => return Err(ArgsError::UnknownCommand(other.to_string())),
        };

        Ok(Some(Self {
            db_url,
            catalog_path,
            resources_path,
            command,
        }))
    }
}

/// Turn `sqlite:<path>` or a bare path into `sqlite://<absolute path>`.
fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path = PathBuf::from(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir().map_or_else(|_| path.clone(), |cwd| cwd.join(&path))
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file (and its directory) so SQLite can open it.
fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let file = match db_url.strip_prefix("sqlite://") {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => {
            return Err(ArgsError::InvalidDbUrl {
                raw: db_url.to_string(),
            }
            .into());
        }
    };
    if file.exists() {
        return Ok(());
    }

    if let Some(dir) = file.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::File::create(&file)?;
    tracing::info!(path = %file.display(), "created progress database");
    Ok(())
}

fn load_catalog(path: Option<&PathBuf>) -> Result<InMemoryCatalog, Box<dyn std::error::Error>> {
    let catalog = match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading catalog");
            InMemoryCatalog::from_json(&std::fs::read_to_string(path)?)?
        }
        None => InMemoryCatalog::from_json(DEMO_CATALOG)?,
    };
    Ok(catalog)
}

fn load_resources(path: Option<&PathBuf>) -> Result<StaticResourceTable, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading static resources");
            Ok(StaticResourceTable::from_json(&std::fs::read_to_string(path)?)?)
        }
        None => Ok(StaticResourceTable::builtin()),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = match Args::parse(&mut argv) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            return Err(e.into());
        }
    };

    // Open + migrate SQLite at startup. Keep this in the binary glue so services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let catalog: Arc<dyn CourseCatalog> = Arc::new(load_catalog(parsed.catalog_path.as_ref())?);
    let resources = load_resources(parsed.resources_path.as_ref())?;
    let app = AppServices::new_sqlite(&parsed.db_url, catalog, resources).await?;
    app.catalog().initialize().await;

    match parsed.command {
        Command::Home => {
            let featured = app.catalog().featured_courses().await?;
            println!("Featured courses");
            print_courses(&app, &featured);
            Ok(())
        }
        Command::Courses { subject } => list_courses(&app, &subject).await,
        Command::Course { id } => show_course(&app, id).await,
        Command::Lesson { course, lesson } => show_lesson(&app, course, lesson).await,
        Command::Search { query } => search(&app, &query).await,
        Command::Complete { lesson } => {
            app.progress().mark_complete(lesson).await;
            println!("lesson {lesson} marked complete");
            Ok(())
        }
        Command::Uncomplete { lesson } => {
            app.progress().mark_incomplete(lesson).await;
            println!("lesson {lesson} marked incomplete");
            Ok(())
        }
        Command::Toggle { lesson } => {
            let now_complete = app.progress().toggle(lesson).await;
            let state = if now_complete { "complete" } else { "incomplete" };
            println!("lesson {lesson} is now {state}");
            Ok(())
        }
    }
}

async fn list_courses(app: &AppServices, subject: &SubjectFilter) -> Result<(), Box<dyn std::error::Error>> {
    let courses = app.catalog().courses_by_subject(subject).await?;
    if courses.is_empty() {
        println!("No courses found for this subject");
        return Ok(());
    }
    print_courses(app, &courses);
    Ok(())
}

fn print_courses(app: &AppServices, courses: &[Course]) {
    let progress = app.progress();
    for course in courses {
        let summary = progress.course_progress(course);
        let done = if summary.has_started() {
            format!("  {}%", summary.rounded_percent())
        } else {
            String::new()
        };
        println!(
            "[{}] {} ({}) - {} chapters, {} lessons{done}",
            course.id,
            course.title,
            course.subject,
            course.chapters.len(),
            summary.total,
        );
    }
}

async fn show_course(app: &AppServices, id: CourseId) -> Result<(), Box<dyn std::error::Error>> {
    let Some(course) = app.catalog().course_by_id(id).await? else {
        println!("Course not found");
        return Ok(());
    };

    let progress = app.progress();
    let summary = progress.course_progress(&course);
    println!("{} ({})", course.title, course.subject);
    println!("{}", course.description);
    println!("progress: {}/{} lessons", summary.completed, summary.total);

    for chapter in &course.chapters {
        let chapter_summary = progress.chapter_progress(chapter);
        println!(
            "\n{} [{}/{}]",
            chapter.title, chapter_summary.completed, chapter_summary.total
        );
        for lesson in &chapter.lessons {
            let mark = if progress.is_complete(lesson.id) { "x" } else { " " };
            println!("  [{mark}] {} {}", lesson.id, lesson.title);
        }
    }
    Ok(())
}

async fn show_lesson(
    app: &AppServices,
    course_id: CourseId,
    lesson_id: LessonId,
) -> Result<(), Box<dyn std::error::Error>> {
    let view = match app.lessons().lesson_view(course_id, lesson_id).await? {
        LessonLookup::CourseNotFound | LessonLookup::LessonNotFound => {
            println!("Lesson not found");
            return Ok(());
        }
        LessonLookup::Found(view) => view,
    };

    println!("{} > {}", view.course_title, view.chapter_title);
    println!(
        "{} ({}/{}){}",
        view.lesson.title,
        view.position + 1,
        view.total,
        if view.completed { "  [completed]" } else { "" }
    );
    println!("{}", view.lesson.description);

    if let Some(video) = &view.primary_video {
        println!("\nWatch video: {}", video.url);
    }
    if !view.resources.is_empty() {
        println!("\nResources:");
        for resource in &view.resources {
            let action = match resource.affordance() {
                Affordance::Download => "download",
                Affordance::Open => "open",
            };
            println!(
                "  {} ({}) [{action}] {}",
                resource.title, resource.resource_type, resource.url
            );
        }
    }

    println!();
    if let Some(previous) = &view.previous {
        println!("previous: {} {}", previous.id, previous.title);
    }
    match &view.next {
        Some(next) => println!("next: {} {}", next.id, next.title),
        None => println!("end of course: back to course {}", view.course_id),
    }
    Ok(())
}

async fn search(app: &AppServices, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    match app.search().search(query).await? {
        SearchOutcome::EmptyQuery => println!("Enter a search term to find courses and lessons"),
        SearchOutcome::NoResults => println!("No results found for \"{}\"", query.trim()),
        SearchOutcome::Results(results) => {
            if !results.courses.is_empty() {
                println!("Courses ({})", results.courses.len());
                for course in &results.courses {
                    println!("  [{}] {} ({})", course.id, course.title, course.subject);
                }
            }
            if !results.lessons.is_empty() {
                println!("Lessons ({})", results.lessons.len());
                for hit in &results.lessons {
                    let owner = hit
                        .course
                        .as_ref()
                        .map_or_else(|| "unknown course".to_string(), |c| c.title.clone());
                    println!("  [{}] {} - {owner}", hit.lesson.id, hit.lesson.title);
                }
            }
        }
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Option<Args>, ArgsError> {
        let mut iter = args.iter().map(|s| (*s).to_string());
        Args::parse(&mut iter)
    }

    #[test]
    fn no_arguments_lists_all_courses() {
        let args = parse(&[]).unwrap().unwrap();
        assert_eq!(args.command, Command::Courses { subject: SubjectFilter::All });
    }

    #[test]
    fn parses_lesson_command_and_flags() {
        let args = parse(&["--db", "sqlite::memory:", "lesson", "1", "3"]).unwrap().unwrap();
        assert_eq!(args.db_url, "sqlite::memory:");
        assert_eq!(
            args.command,
            Command::Lesson {
                course: CourseId::new(1),
                lesson: LessonId::new(3),
            }
        );
    }

    #[test]
    fn relative_db_paths_become_absolute_urls() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        assert_eq!(normalize_sqlite_url("sqlite:///tmp/p.db".into()), "sqlite:///tmp/p.db");
        assert_eq!(normalize_sqlite_url("sqlite:/tmp/p.db".into()), "sqlite:///tmp/p.db");
        let relative = normalize_sqlite_url("progress.sqlite3".into());
        assert!(relative.starts_with("sqlite:///"), "{relative}");
        assert!(relative.ends_with("/progress.sqlite3"));
    }

    #[test]
    fn prepare_creates_missing_database_file() {
        let dir = std::env::temp_dir().join(format!("learn-prepare-{}", std::process::id()));
        let file = dir.join("nested").join("progress.sqlite3");
        let url = format!("sqlite://{}", file.display());

        prepare_sqlite_file(&url).unwrap();
        assert!(file.exists());
        prepare_sqlite_file(&url).unwrap();

        assert!(prepare_sqlite_file("sqlite::memory:").is_ok());
        assert!(prepare_sqlite_file("sqlite://").is_err());
        assert!(prepare_sqlite_file("postgres://db").is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn home_lists_featured_courses() {
        let args = parse(&["home"]).unwrap().unwrap();
        assert_eq!(args.command, Command::Home);
    }

    #[test]
    fn search_joins_remaining_words() {
        let args = parse(&["search", "cell", "structure"]).unwrap().unwrap();
        assert_eq!(args.command, Command::Search { query: "cell structure".into() });
    }

    #[test]
    fn subject_flag_filters_course_listing() {
        let args = parse(&["courses", "--subject", "Biology"]).unwrap().unwrap();
        assert_eq!(
            args.command,
            Command::Courses { subject: SubjectFilter::Subject("Biology".into()) }
        );
    }

    #[test]
    fn rejects_bad_ids_and_unknown_commands() {
        assert!(matches!(parse(&["complete", "five"]), Err(ArgsError::InvalidId { .. })));
        assert!(matches!(parse(&["course"]), Err(ArgsError::MissingArgument { .. })));
        assert!(matches!(parse(&["teleport"]), Err(ArgsError::UnknownCommand(_))));
        assert!(matches!(parse(&["--db"]), Err(ArgsError::MissingValue { .. })));
    }

    #[test]
    fn help_returns_none() {
        assert!(parse(&["--help"]).unwrap().is_none());
    }

    #[test]
    fn demo_catalog_parses() {
        let catalog = InMemoryCatalog::from_json(DEMO_CATALOG).unwrap();
        assert_eq!(catalog.courses().len(), 4);
        let table = StaticResourceTable::builtin();
        for course in catalog.courses() {
            let first = course.chapters[0].lessons[0].id;
            assert!(!table.for_lesson(first).is_empty(), "course {} has shipped notes", course.id);
        }
    }
}
