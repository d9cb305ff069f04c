//! The package descriptor and its phases

use crate::context::PhaseContext;
use crate::copy::{copy_rules, CopyReport, MissingSourcePolicy};
use crate::pattern::CompiledRule;
use pkgrecipe_errors::{Error, RecipeError, Result};
use pkgrecipe_events::{AppEvent, EventEmitter, FailureContext, RecipeEvent, RecipePhase};
use pkgrecipe_types::{CopyRule, Declaration, DependencyRef, PackageId, RecipeFile};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A validated package recipe
///
/// Construction compiles every glob and checks every rule directory, so the
/// phases themselves can only fail on the filesystem. The descriptor holds no
/// state between phases; `package`, `imports` and `export_sources` may run in
/// any order, any number of times.
#[derive(Debug, Clone)]
pub struct PackageDescriptor {
    declaration: Declaration,
    exports: Vec<CompiledRule>,
    package_rules: Vec<CompiledRule>,
    import_rules: Vec<CompiledRule>,
}

impl PackageDescriptor {
    /// Start building a descriptor for `name`/`version`
    pub fn builder(
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> PackageDescriptorBuilder {
        PackageDescriptorBuilder::new()
            .with_name(name)
            .with_version(version)
    }

    /// Validate a parsed recipe file
    ///
    /// # Errors
    ///
    /// Same as [`PackageDescriptorBuilder::build`].
    pub fn from_recipe(recipe: RecipeFile) -> std::result::Result<Self, RecipeError> {
        let mut builder = Self::builder(recipe.name, recipe.version)
            .with_license(recipe.license)
            .with_url(recipe.url);
        if let Some(description) = recipe.description {
            builder = builder.with_description(description);
        }
        for generator in recipe.generators.to_set() {
            builder = builder.with_generator(generator);
        }
        for requirement in recipe.requires.as_slice() {
            builder = builder.with_requires(requirement.as_str());
        }
        for export in recipe.exports {
            builder = builder.with_export(export);
        }
        for rule in recipe.package {
            builder = builder.with_package_rule(rule);
        }
        for rule in recipe.imports {
            builder = builder.with_import_rule(rule);
        }
        builder.build()
    }

    /// Read and validate a YAML recipe from disk
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, otherwise any recipe
    /// parse or validation error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::io_with_path(&e, path))?;
        let recipe = RecipeFile::from_yaml(&contents)?;
        Ok(Self::from_recipe(recipe)?)
    }

    /// Static identity, metadata and requirements for the hosting resolver
    #[must_use]
    pub fn declare(&self) -> Declaration {
        self.declaration.clone()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.declaration.name
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.declaration.version
    }

    #[must_use]
    pub fn id(&self) -> PackageId {
        PackageId::new(self.name(), self.version())
    }

    #[must_use]
    pub fn requirements(&self) -> &[DependencyRef] {
        &self.declaration.requirements
    }

    #[must_use]
    pub fn generators(&self) -> &BTreeSet<String> {
        &self.declaration.generators
    }

    pub fn package_rules(&self) -> impl Iterator<Item = &CopyRule> {
        self.package_rules.iter().map(CompiledRule::rule)
    }

    pub fn import_rules(&self) -> impl Iterator<Item = &CopyRule> {
        self.import_rules.iter().map(CompiledRule::rule)
    }

    pub fn exports(&self) -> impl Iterator<Item = &str> {
        self.exports
            .iter()
            .map(|rule| rule.rule().file_pattern.as_str())
    }

    /// Materialize the redistributable package from a built source tree
    ///
    /// # Errors
    ///
    /// Returns `RecipeError::MissingSourceDirectory` (leaving `package_root`
    /// untouched) if any rule's source directory is absent under `root`.
    pub fn package(&self, root: &Path, package_root: &Path) -> Result<CopyReport> {
        self.package_with(root, package_root, &PhaseContext::silent())
    }

    /// [`Self::package`], reporting through `ctx`
    ///
    /// # Errors
    ///
    /// See [`Self::package`].
    pub fn package_with(
        &self,
        root: &Path,
        package_root: &Path,
        ctx: &PhaseContext,
    ) -> Result<CopyReport> {
        self.run_phase(
            RecipePhase::Package,
            &self.package_rules,
            root,
            package_root,
            MissingSourcePolicy::Fail,
            ctx,
        )
    }

    /// Copy a built dependency's artifacts into the local import area
    ///
    /// A rule whose source directory is missing under `root` matches nothing.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if walking `root` or writing under `import_root`
    /// fails.
    pub fn imports(&self, root: &Path, import_root: &Path) -> Result<CopyReport> {
        self.imports_with(root, import_root, &PhaseContext::silent())
    }

    /// [`Self::imports`], reporting through `ctx`
    ///
    /// # Errors
    ///
    /// See [`Self::imports`].
    pub fn imports_with(
        &self,
        root: &Path,
        import_root: &Path,
        ctx: &PhaseContext,
    ) -> Result<CopyReport> {
        self.run_phase(
            RecipePhase::Imports,
            &self.import_rules,
            root,
            import_root,
            MissingSourcePolicy::Skip,
            ctx,
        )
    }

    /// Run `imports` once per resolved dependency root, in the given order
    ///
    /// # Errors
    ///
    /// Stops at the first root whose import fails.
    pub fn imports_from(
        &self,
        roots: &[PathBuf],
        import_root: &Path,
        ctx: &PhaseContext,
    ) -> Result<CopyReport> {
        let mut report = CopyReport::default();
        for root in roots {
            report.merge(self.imports_with(root, import_root, ctx)?);
        }
        Ok(report)
    }

    /// Copy the export set, paths preserved, from the recipe directory
    ///
    /// # Errors
    ///
    /// Returns `RecipeError::MissingSourceDirectory` if `recipe_dir` does not
    /// exist, or an I/O error from the copy.
    pub fn export_sources(
        &self,
        recipe_dir: &Path,
        export_root: &Path,
        ctx: &PhaseContext,
    ) -> Result<CopyReport> {
        self.run_phase(
            RecipePhase::Export,
            &self.exports,
            recipe_dir,
            export_root,
            MissingSourcePolicy::Fail,
            ctx,
        )
    }

    fn run_phase(
        &self,
        phase: RecipePhase,
        rules: &[CompiledRule],
        root: &Path,
        dest: &Path,
        policy: MissingSourcePolicy,
        ctx: &PhaseContext,
    ) -> Result<CopyReport> {
        let package = self.id().to_string();
        info!(%package, %phase, root = %root.display(), dest = %dest.display(), "phase started");
        ctx.emit(AppEvent::Recipe(RecipeEvent::PhaseStarted {
            package: package.clone(),
            phase,
            root: root.to_path_buf(),
            destination: dest.to_path_buf(),
        }));

        match copy_rules(rules, root, dest, policy, phase, ctx) {
            Ok(report) => {
                info!(
                    %package,
                    %phase,
                    copied = report.copied.len(),
                    unchanged = report.unchanged.len(),
                    "phase completed"
                );
                ctx.emit(AppEvent::Recipe(RecipeEvent::PhaseCompleted {
                    package,
                    phase,
                    copied: report.copied.len(),
                    unchanged: report.unchanged.len(),
                }));
                Ok(report)
            }
            Err(err) => {
                warn!(%package, %phase, error = %err, "phase failed");
                ctx.emit(AppEvent::Recipe(RecipeEvent::PhaseFailed {
                    package,
                    phase,
                    failure: FailureContext::from_error(&err),
                }));
                Err(err)
            }
        }
    }
}

/// Builder for [`PackageDescriptor`]
#[derive(Debug, Clone, Default)]
pub struct PackageDescriptorBuilder {
    name: Option<String>,
    version: Option<String>,
    license: String,
    url: String,
    description: Option<String>,
    generators: BTreeSet<String>,
    requires: Vec<String>,
    exports: Vec<String>,
    package_rules: Vec<CopyRule>,
    import_rules: Vec<CopyRule>,
}

impl PackageDescriptorBuilder {
    /// Create new descriptor builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = license.into();
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a build-system generator identifier (duplicates collapse)
    #[must_use]
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generators.insert(generator.into());
        self
    }

    /// Add a pinned requirement (`name/version@owner/channel`)
    #[must_use]
    pub fn with_requires(mut self, reference: impl Into<String>) -> Self {
        self.requires.push(reference.into());
        self
    }

    /// Add a recipe-relative export glob
    #[must_use]
    pub fn with_export(mut self, pattern: impl Into<String>) -> Self {
        self.exports.push(pattern.into());
        self
    }

    #[must_use]
    pub fn with_package_rule(mut self, rule: CopyRule) -> Self {
        self.package_rules.push(rule);
        self
    }

    #[must_use]
    pub fn with_import_rule(mut self, rule: CopyRule) -> Self {
        self.import_rules.push(rule);
        self
    }

    /// Validate everything and produce the descriptor
    ///
    /// # Errors
    ///
    /// - `MissingField` for an empty name, version or generator
    /// - `InvalidReference` for a requirement that is not fully pinned
    /// - `InvalidPattern` for a glob that does not compile
    /// - `PathEscapesRoot` for a rule directory that is absolute or uses `..`
    pub fn build(self) -> std::result::Result<PackageDescriptor, RecipeError> {
        let name = required(self.name, "name")?;
        let version = required(self.version, "version")?;
        if self.generators.iter().any(|g| g.trim().is_empty()) {
            return Err(RecipeError::MissingField {
                field: "generators".to_string(),
            });
        }

        let requirements = self
            .requires
            .iter()
            .map(|r| DependencyRef::parse(r))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let exports = self
            .exports
            .into_iter()
            .map(|pattern| CompiledRule::compile(CopyRule::new(pattern, "", "")))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let package_rules = compile_all(self.package_rules)?;
        let import_rules = compile_all(self.import_rules)?;

        Ok(PackageDescriptor {
            declaration: Declaration {
                name,
                version,
                license: self.license,
                url: self.url,
                description: self.description,
                generators: self.generators,
                requirements,
            },
            exports,
            package_rules,
            import_rules,
        })
    }
}

fn required(value: Option<String>, field: &str) -> std::result::Result<String, RecipeError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| RecipeError::MissingField {
            field: field.to_string(),
        })
}

fn compile_all(rules: Vec<CopyRule>) -> std::result::Result<Vec<CompiledRule>, RecipeError> {
    rules.into_iter().map(CompiledRule::compile).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ventura() -> PackageDescriptorBuilder {
        PackageDescriptor::builder("ventura", "0.8")
            .with_license("MIT")
            .with_url("http://github.com/TyRoXx/ventura")
            .with_generator("cmake")
            .with_requires("silicium/0.12@TyRoXx/stable")
            .with_export("ventura/*")
            .with_package_rule(CopyRule::new("*.hpp", "include/ventura", "ventura"))
            .with_import_rule(CopyRule::new("*.dll", "bin", "bin"))
            .with_import_rule(CopyRule::new("*.dylib*", "bin", "lib"))
    }

    #[test]
    fn test_build_ventura() {
        let descriptor = ventura().build().unwrap();
        assert_eq!(descriptor.id().to_string(), "ventura/0.8");
        assert_eq!(descriptor.package_rules().count(), 1);
        assert_eq!(descriptor.import_rules().count(), 2);
        assert_eq!(descriptor.exports().collect::<Vec<_>>(), vec!["ventura/*"]);
    }

    #[test]
    fn test_missing_identity() {
        let err = PackageDescriptorBuilder::new()
            .with_version("1.0")
            .build()
            .unwrap_err();
        assert!(matches!(err, RecipeError::MissingField { field } if field == "name"));

        let err = PackageDescriptor::builder("ventura", " ").build().unwrap_err();
        assert!(matches!(err, RecipeError::MissingField { field } if field == "version"));
    }

    #[test]
    fn test_invalid_requirement() {
        let err = ventura().with_requires("silicium/[>0.10]").build().unwrap_err();
        assert!(matches!(err, RecipeError::InvalidReference { .. }));
    }

    #[test]
    fn test_invalid_export_pattern() {
        let err = ventura().with_export("ventura/[").build().unwrap_err();
        assert!(matches!(err, RecipeError::InvalidPattern { .. }));
    }

    #[test]
    fn test_generators_collapse() {
        let descriptor = ventura().with_generator("cmake").build().unwrap();
        assert_eq!(descriptor.generators().len(), 1);
    }
}
