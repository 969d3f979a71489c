#![deny(missing_docs)]

//! # Code Generation
//!
//! Turns the expanded IR into rendered source files.
//!
//! The stage is split in two:
//! - [`RenderPlan`] decides which template renders which output file with which context.
//! - A [`TemplateRenderer`] turns one job into text; [`TeraRenderer`] loads a bundle
//!   directory with `tera`.

use crate::error::{AppError, AppResult};
use crate::oas::document::Server;
use crate::oas::models::{GeneratedApi, Model};
use crate::oas::naming::capitalize_first;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use walkdir::WalkDir;

/// Where templates live inside a bundle and where their output goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct OutputLayout {
    /// Template rendering each object model.
    pub object_template: String,
    /// Template rendering each enum model.
    pub enum_template: String,
    /// Template rendering each endpoint group.
    pub endpoints_template: String,
    /// Bundle directory whose files are rendered once with the API context.
    pub project_dir: String,
    /// Output directory of model files.
    pub models_dir: String,
    /// Output directory of endpoint group files.
    pub endpoints_dir: String,
    /// Extension of model and endpoint files.
    pub extension: String,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            object_template: "object.tera".into(),
            enum_template: "enum.tera".into(),
            endpoints_template: "endpoints.tera".into(),
            project_dir: "project".into(),
            models_dir: "src/models".into(),
            endpoints_dir: "src/endpoints".into(),
            extension: "rs".into(),
        }
    }
}

/// Context of the project-level templates.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectContext<'a> {
    /// Capitalized API title.
    pub name: String,
    /// API title.
    pub title: &'a str,
    /// API description.
    pub description: &'a str,
    /// API version.
    pub version: &'a str,
    /// Named servers.
    pub servers: &'a [Server],
    /// Generated model names.
    pub models: Vec<&'a str>,
    /// Generated endpoint group names.
    pub groups: Vec<&'a str>,
}

/// One render call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    /// Template name inside the bundle.
    pub template: String,
    /// Output path relative to the output directory.
    pub output: PathBuf,
    /// Template context.
    pub context: serde_json::Value,
}

/// The full list of render calls of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderPlan {
    /// Jobs, project files first, then models, then endpoint groups.
    pub jobs: Vec<RenderJob>,
}

impl RenderPlan {
    /// Builds the plan.
    ///
    /// # Arguments
    ///
    /// * `api` - The expanded IR.
    /// * `layout` - Template names and output directories.
    /// * `project_templates` - Template names found under the layout's project directory.
    pub fn build(
        api: &GeneratedApi,
        layout: &OutputLayout,
        project_templates: &[String],
    ) -> AppResult<Self> {
        let mut jobs = Vec::new();

        let project = ProjectContext {
            name: capitalize_first(&api.info.title),
            title: &api.info.title,
            description: api.info.description.as_deref().unwrap_or_default(),
            version: &api.info.version,
            servers: &api.servers,
            models: api.models.iter().map(Model::name).collect(),
            groups: api.groups.iter().map(|g| g.name.as_str()).collect(),
        };
        let project_context = serde_json::to_value(&project)?;
        for template in project_templates {
            jobs.push(RenderJob {
                template: template.clone(),
                output: project_output(template, &layout.project_dir),
                context: project_context.clone(),
            });
        }

        for model in &api.models {
            let (template, context) = match model {
                Model::Object(object) => (&layout.object_template, serde_json::to_value(object)?),
                Model::Enum(e) => (&layout.enum_template, serde_json::to_value(e)?),
            };
            jobs.push(RenderJob {
                template: template.clone(),
                output: Path::new(&layout.models_dir)
                    .join(format!("{}.{}", model.name(), layout.extension)),
                context,
            });
        }

        for group in &api.groups {
            jobs.push(RenderJob {
                template: layout.endpoints_template.clone(),
                output: Path::new(&layout.endpoints_dir)
                    .join(format!("{}.{}", group.name, layout.extension)),
                context: serde_json::to_value(group)?,
            });
        }

        Ok(Self { jobs })
    }
}

/// `project/src/lib.rs.tera` -> `src/lib.rs`
fn project_output(template: &str, project_dir: &str) -> PathBuf {
    let relative = template
        .strip_prefix(project_dir)
        .map(|rest| rest.trim_start_matches('/'))
        .unwrap_or(template);
    PathBuf::from(relative.strip_suffix(".tera").unwrap_or(relative))
}

/// A rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Path relative to the output directory.
    pub path: PathBuf,
    /// File contents.
    pub contents: String,
}

/// Renders one template with a context.
pub trait TemplateRenderer {
    /// Renders `template` with `context`.
    fn render(&self, template: &str, context: &serde_json::Value) -> AppResult<String>;

    /// Names of the project-level templates under `project_dir`.
    fn project_templates(&self, project_dir: &str) -> Vec<String>;
}

/// `tera` backed renderer over a template bundle directory.
pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    /// Loads every file below `dir` as a template named by its `/`-separated relative path.
    ///
    /// Autoescaping is disabled: the output is source code, not HTML.
    pub fn from_dir(dir: &Path) -> AppResult<Self> {
        if !dir.is_dir() {
            return Err(AppError::General(format!(
                "Template directory not found: {:?}",
                dir
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry
                .map_err(|e| AppError::General(format!("Failed to walk templates: {}", e)))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(dir)
                .map_err(|e| AppError::General(e.to_string()))?;
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            files.push((entry.path().to_path_buf(), Some(name)));
        }

        tracing::debug!(dir = ?dir, templates = files.len(), "loading template bundle");

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_template_files(files).map_err(|e| AppError::Template {
            template: dir.display().to_string(),
            message: tera_message(&e),
        })?;

        Ok(Self { tera })
    }

    /// Builds a renderer from in-memory `(name, source)` pairs.
    pub fn from_raw(templates: &[(&str, &str)]) -> AppResult<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(templates.to_vec())
            .map_err(|e| AppError::Template {
                template: "<raw>".into(),
                message: tera_message(&e),
            })?;
        Ok(Self { tera })
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(&self, template: &str, context: &serde_json::Value) -> AppResult<String> {
        let context = Context::from_serialize(context).map_err(|e| AppError::Template {
            template: template.to_string(),
            message: tera_message(&e),
        })?;
        self.tera
            .render(template, &context)
            .map_err(|e| AppError::Template {
                template: template.to_string(),
                message: tera_message(&e),
            })
    }

    fn project_templates(&self, project_dir: &str) -> Vec<String> {
        let prefix = format!("{}/", project_dir.trim_end_matches('/'));
        let mut names: Vec<String> = self
            .tera
            .get_template_names()
            .filter(|name| name.starts_with(&prefix))
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }
}

/// Tera nests the useful diagnostics in the error's source chain.
fn tera_message(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Renders every job of the API's plan, stopping at the first failure.
pub fn generate(
    api: &GeneratedApi,
    renderer: &impl TemplateRenderer,
    layout: &OutputLayout,
) -> AppResult<Vec<RenderedFile>> {
    let project_templates = renderer.project_templates(&layout.project_dir);
    let plan = RenderPlan::build(api, layout, &project_templates)?;

    plan.jobs
        .iter()
        .map(|job| {
            tracing::debug!(template = %job.template, output = ?job.output, "rendering");
            Ok(RenderedFile {
                path: job.output.clone(),
                contents: renderer.render(&job.template, &job.context)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::{parse_and_expand, ExpandOptions};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    const API: &str = r#"
info: {title: petstore, description: Pets, version: '2'}
servers:
  - url: https://pets.example.com
components:
  schemas:
    Pet:
      type: object
      required: [name]
      properties:
        name: {type: string}
        kind: {type: string, enum: [cat, dog]}
    Color:
      type: string
      enum: [red]
paths:
  /pets/{id}:
    get:
      summary: Fetch a pet
      parameters:
        - {name: id, in: path, required: true, schema: {type: integer, format: int64}}
      responses:
        '200':
          description: OK
          content:
            application/json:
              schema: {$ref: '#/components/schemas/Pet'}
"#;

    fn api() -> GeneratedApi {
        parse_and_expand(API, &ExpandOptions::default()).unwrap()
    }

    // Mock renderer capturing the calls
    struct RecordingRenderer {
        calls: RefCell<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl TemplateRenderer for RecordingRenderer {
        fn render(&self, template: &str, context: &serde_json::Value) -> AppResult<String> {
            self.calls.borrow_mut().push(template.to_string());
            if self.fail_on == Some(template) {
                return Err(AppError::Template {
                    template: template.into(),
                    message: "boom".into(),
                });
            }
            Ok(format!("{}:{}", template, context["name"]))
        }

        fn project_templates(&self, project_dir: &str) -> Vec<String> {
            vec![format!("{}/README.md.tera", project_dir)]
        }
    }

    #[test]
    fn test_plan_one_job_per_file() {
        let project = vec!["project/Cargo.toml".to_string()];
        let plan = RenderPlan::build(&api(), &OutputLayout::default(), &project).unwrap();
        let outputs: Vec<(&str, String)> = plan
            .jobs
            .iter()
            .map(|j| (j.template.as_str(), j.output.to_string_lossy().into_owned()))
            .collect();
        assert_eq!(
            outputs,
            vec![
                ("project/Cargo.toml", "Cargo.toml".to_string()),
                ("object.tera", "src/models/Pet.rs".to_string()),
                ("enum.tera", "src/models/Color.rs".to_string()),
                ("endpoints.tera", "src/endpoints/PetsByID.rs".to_string()),
            ]
        );

        let project = &plan.jobs[0].context;
        assert_eq!(project["name"], "Petstore");
        assert_eq!(project["servers"][0]["name"], "server0");
        assert_eq!(project["models"], serde_json::json!(["Pet", "Color"]));
    }

    #[test]
    fn test_project_output_paths() {
        assert_eq!(project_output("project/README.md.tera", "project"), PathBuf::from("README.md"));
        assert_eq!(project_output("project/src/lib.rs", "project"), PathBuf::from("src/lib.rs"));
    }

    #[test]
    fn test_generate_with_mock_renderer() {
        let renderer = RecordingRenderer {
            calls: RefCell::new(Vec::new()),
            fail_on: None,
        };
        let files = generate(&api(), &renderer, &OutputLayout::default()).unwrap();
        assert_eq!(files.len(), 4);
        assert_eq!(files[0].path, PathBuf::from("README.md"));
        assert_eq!(files[0].contents, "project/README.md.tera:\"Petstore\"");
        assert_eq!(files[1].contents, "object.tera:\"Pet\"");
        assert_eq!(renderer.calls.borrow().len(), 4);
    }

    #[test]
    fn test_generate_stops_on_failure() {
        let renderer = RecordingRenderer {
            calls: RefCell::new(Vec::new()),
            fail_on: Some("object.tera"),
        };
        let err = generate(&api(), &renderer, &OutputLayout::default()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Template { ref template, .. } if template == "object.tera"
        ));
        assert_eq!(renderer.calls.borrow().len(), 2);
    }

    #[test]
    fn test_tera_renderer_renders_models() {
        let renderer = TeraRenderer::from_raw(&[
            (
                "object.tera",
                "pub struct {{ name }} {\n{% for p in properties %}    pub {{ p.name }}: {% if p.optional %}Option<{{ p.type }}>{% else %}{{ p.type }}{% endif %},\n{% endfor %}}\n",
            ),
            ("enum.tera", "enum {{ name }} {% for c in cases %}{{ c.name }} {% endfor %}"),
            (
                "endpoints.tera",
                "{% for e in endpoints %}{{ e.method | upper }} {{ e.path }} -> {{ e.response_type }}\n{% endfor %}",
            ),
            ("project/README.md.tera", "# {{ name }} v{{ version }}"),
        ])
        .unwrap();

        let files = generate(&api(), &renderer, &OutputLayout::default()).unwrap();
        assert_eq!(files[0].contents, "# Petstore v2");
        assert_eq!(
            files[1].contents,
            "pub struct Pet {\n    pub kind: Option<PetKind>,\n    pub name: String,\n}\n"
        );
        assert_eq!(files[2].contents, "enum Color red ");
        assert_eq!(files[3].contents, "GET pets/{id} -> models::Pet\n");
    }

    #[test]
    fn test_tera_renderer_missing_template() {
        let renderer = TeraRenderer::from_raw(&[("object.tera", "x")]).unwrap();
        let err = renderer
            .render("enum.tera", &serde_json::json!({}))
            .unwrap_err();
        assert!(matches!(err, AppError::Template { .. }));
    }

    #[test]
    fn test_tera_renderer_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("project/src")).unwrap();
        std::fs::write(dir.path().join("project/src/lib.rs.tera"), "// {{ title }}").unwrap();
        std::fs::write(dir.path().join("object.tera"), "{{ name }}").unwrap();

        let renderer = TeraRenderer::from_dir(dir.path()).unwrap();
        assert_eq!(
            renderer.project_templates("project"),
            vec!["project/src/lib.rs.tera".to_string()]
        );
        let out = renderer
            .render("project/src/lib.rs.tera", &serde_json::json!({"title": "pets"}))
            .unwrap();
        assert_eq!(out, "// pets");
    }

    #[test]
    fn test_tera_renderer_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(TeraRenderer::from_dir(&missing).is_err());
    }
}
