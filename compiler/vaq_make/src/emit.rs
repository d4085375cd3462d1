//! Makefile emission.
//!
//! The build directory gets a top-level `Makefile` that delegates to one
//! `target.<name>/build.make` per target and regenerates itself when the
//! script changes.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use vaq_diagnostic::{Diagnostic, ErrorContext};
use vaq_eval::Runtime;
use vaq_runtime::{ObjRef, Value};

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("Could not write '{}': {source}.", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "Source file at '{}' is not in source directory '{}'.",
        file.display(),
        source_dir.display()
    )]
    OutsideSourceDir { file: PathBuf, source_dir: PathBuf },

    #[error("Duplicate target name '{0}'.")]
    DuplicateTarget(String),

    #[error("Tried building target of unknown type {0}.")]
    UnknownTarget(String),

    #[error("Expected {expected} in executable {field}.")]
    Malformed {
        field: &'static str,
        expected: &'static str,
    },
}

impl EmitError {
    pub fn context(&self) -> ErrorContext {
        match self {
            EmitError::OutsideSourceDir { .. } | EmitError::DuplicateTarget(_) => ErrorContext::User,
            EmitError::Io { .. } | EmitError::UnknownTarget(_) | EmitError::Malformed { .. } => {
                ErrorContext::Internal
            }
        }
    }

    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic::new(self.context(), self.to_string())
    }
}

/// An `Executable` target, read back out of the heap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Executable {
    pub name: String,
    /// Absolute source paths.
    pub sources: Vec<PathBuf>,
    pub include_directories: Vec<String>,
    pub link_libraries: Vec<String>,
}

/// Read every constructed target, rejecting unknown kinds and duplicate names.
pub fn collect_targets(rt: &mut Runtime) -> Result<Vec<Executable>, EmitError> {
    let executable_class = rt.classes().executable;
    let mut seen = FxHashSet::default();
    let mut targets = Vec::with_capacity(rt.targets().len());

    for target in rt.targets().to_vec() {
        let instance = match target {
            Value::Object(r) if rt.heap.as_instance(r).is_some() => r,
            _ => return Err(EmitError::UnknownTarget(rt.heap.type_name(target).to_owned())),
        };
        if rt.heap.as_instance(instance).map(|i| i.class) != Some(executable_class) {
            let class = rt.heap.class_name(instance).unwrap_or_default().to_owned();
            return Err(EmitError::UnknownTarget(class));
        }

        let executable = read_executable(rt, instance)?;
        if !seen.insert(executable.name.clone()) {
            return Err(EmitError::DuplicateTarget(executable.name));
        }
        targets.push(executable);
    }
    Ok(targets)
}

fn read_executable(rt: &mut Runtime, instance: ObjRef) -> Result<Executable, EmitError> {
    let name = rt.field(instance, "name").unwrap_or_default();
    let name = rt
        .heap
        .value_str(name)
        .ok_or(EmitError::Malformed {
            field: "name",
            expected: "string",
        })?
        .to_owned();

    let sources = string_array(rt, instance, "sources")?
        .into_iter()
        .map(PathBuf::from)
        .collect();
    Ok(Executable {
        name,
        sources,
        include_directories: string_array(rt, instance, "include_directories")?,
        link_libraries: string_array(rt, instance, "link_libraries")?,
    })
}

/// Strings of an array field. A `nil` field reads as empty.
fn string_array(rt: &mut Runtime, instance: ObjRef, field: &'static str) -> Result<Vec<String>, EmitError> {
    let malformed = EmitError::Malformed {
        field,
        expected: "string array",
    };
    let value = rt.field(instance, field).unwrap_or_default();
    if value.is_nil() {
        return Ok(Vec::new());
    }
    let Some(elements) = value.as_object().and_then(|r| rt.heap.as_array(r)) else {
        return Err(malformed);
    };
    elements
        .iter()
        .map(|&element| rt.heap.value_str(element).map(str::to_owned))
        .collect::<Option<Vec<_>>>()
        .ok_or(malformed)
}

/// Write the top-level Makefile and one `build.make` per target.
///
/// `vmake` is the generator executable the regeneration rule invokes.
/// Returns every file written, top-level Makefile last.
pub fn write_makefiles(
    config: &Config,
    targets: &[Executable],
    vmake: &Path,
) -> Result<Vec<PathBuf>, EmitError> {
    create_dir(&config.build_dir)?;

    let mut written = Vec::with_capacity(targets.len() + 1);
    let mut makefile = String::new();
    let _ = writeln!(makefile, "VMAKE = {}", vmake.display());
    let _ = writeln!(makefile, "VMAKE_FILE = {}", config.script.display());
    makefile.push_str("VMAKE_ARGS =");
    for arg in &config.args {
        let _ = write!(makefile, " {arg}");
    }
    makefile.push_str("\n\n");
    makefile.push_str("default_target: self\n.PHONY: default_target\n\n");

    for target in targets {
        let dir = config.build_dir.join(format!("target.{}", target.name));
        create_dir(&dir)?;
        let path = dir.join("build.make");
        write_file(&path, &target_makefile(config, target)?)?;
        tracing::debug!(target = %target.name, path = %path.display(), "wrote target makefile");
        written.push(path);

        let _ = writeln!(makefile, "{}:", target.name);
        let _ = writeln!(makefile, "\t$(MAKE) -s -f {}/build.make {}", dir.display(), target.name);
        let _ = writeln!(makefile, ".PHONY: {}\n", target.name);
    }

    makefile.push_str("all:");
    for target in targets {
        let _ = write!(makefile, " {}", target.name);
    }
    makefile.push_str("\n.PHONY: all\n\n");
    makefile.push_str("self: $(VMAKE_FILE)\n");
    makefile.push_str("\t$(VMAKE) $(VMAKE_ARGS)\n");
    makefile.push_str("\t$(MAKE) -s -f Makefile all\n");
    makefile.push_str(".PHONY: self\n");

    let path = config.build_dir.join("Makefile");
    write_file(&path, &makefile)?;
    written.push(path);
    Ok(written)
}

/// Contents of `target.<name>/build.make`; creates the object directories.
fn target_makefile(config: &Config, target: &Executable) -> Result<String, EmitError> {
    let mut out = String::new();
    for dir in &target.include_directories {
        let _ = writeln!(out, "CFLAGS += -I{dir}");
    }
    if !target.include_directories.is_empty() {
        out.push('\n');
    }
    for lib in &target.link_libraries {
        let _ = writeln!(out, "LIBS += -l{lib}");
    }
    if !target.link_libraries.is_empty() {
        out.push('\n');
    }

    let mut objects = Vec::with_capacity(target.sources.len());
    for source in &target.sources {
        let object = object_path(config, source)?;
        if let Some(parent) = object.parent() {
            create_dir(parent)?;
        }
        let _ = writeln!(out, "{}: {}", target.name, object.display());
        objects.push(object);
    }
    let _ = writeln!(out, "{}:", target.name);
    out.push_str("\t$(CC) $(CFLAGS) $^ -o $@ $(LIBS)\n\n");

    for (object, source) in objects.iter().zip(&target.sources) {
        let _ = writeln!(out, "{}: {}", object.display(), source.display());
        out.push_str("\t$(CC) -c $(CFLAGS) $^ -o $@\n");
    }
    out.push('\n');
    Ok(out)
}

/// `<build>/objects/<source relative to the source dir>`, with `.c` becoming `.o`.
fn object_path(config: &Config, source: &Path) -> Result<PathBuf, EmitError> {
    let relative = source
        .strip_prefix(&config.source_dir)
        .map_err(|_| EmitError::OutsideSourceDir {
            file: source.to_path_buf(),
            source_dir: config.source_dir.clone(),
        })?;
    let mut object = config.build_dir.join("objects").join(relative);
    if object.extension().is_some_and(|ext| ext == "c") {
        object.set_extension("o");
    }
    Ok(object)
}

fn create_dir(path: &Path) -> Result<(), EmitError> {
    fs::create_dir_all(path).map_err(|source| EmitError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), EmitError> {
    fs::write(path, contents).map_err(|source| EmitError::Io {
        path: path.to_path_buf(),
        source,
    })
}
