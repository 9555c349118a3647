use bevy::log::{debug, info, warn};
use std::path::PathBuf;

use crate::components::{BuildContext, FcsComponent};
use crate::document::Element;
use crate::fcs::channel::Channel;
use crate::functions::Function;
use crate::properties::PropertyStore;
use crate::resources::config::FcsConfig;
use crate::resources::errors::{FcsError, Result};

/// What a document configures. All kinds share the same channel list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemType {
    FlightControl,
    Autopilot,
    System,
}

impl SystemType {
    pub fn label(self) -> &'static str {
        match self {
            SystemType::FlightControl => "flight control",
            SystemType::Autopilot => "autopilot",
            SystemType::System => "system",
        }
    }
}

/// The result of assembling one document, committed to the engine only
/// when complete.
#[derive(Debug, Default)]
pub(crate) struct Assembly {
    pub name: String,
    pub channels: Vec<Channel>,
    pub pre_functions: Vec<Function>,
    pub post_functions: Vec<Function>,
}

/// Candidate locations for a `file=` reference, in search order.
pub fn search_paths(file: &str, config: &FcsConfig) -> Vec<PathBuf> {
    let mut name = PathBuf::from(file);
    if name.extension().is_none() {
        name.set_extension(&config.document_extension);
    }
    vec![
        config.aircraft_path.join("Systems").join(&name),
        config.systems_path.join(&name),
        config.aircraft_path.join(&name),
    ]
}

/// Finds the first existing candidate for `file`.
pub fn find_document(file: &str, config: &FcsConfig) -> Result<PathBuf> {
    let searched = search_paths(file, config);
    searched
        .iter()
        .find(|path| path.is_file())
        .cloned()
        .ok_or(FcsError::FileNotFound {
            name: file.to_string(),
            searched,
        })
}

/// Returns the document an element refers to and whether it came from disk.
pub fn resolve_document(element: &Element, config: &FcsConfig) -> Result<(Element, bool)> {
    match (element.attribute("file"), element.attribute("name")) {
        (Some(file), _) => {
            let path = find_document(file, config)?;
            debug!("Reading {} from {}", file, path.display());
            Ok((Element::from_file(&path)?, true))
        }
        (None, Some(_)) => Ok((element.clone(), false)),
        (None, None) => Err(FcsError::StructuralConfig(format!(
            "{} has neither a name nor a file attribute",
            element.describe()
        ))),
    }
}

fn interface_properties(document: &Element, store: &dyn PropertyStore) -> Result<()> {
    for property in document.find_elements("property") {
        let path = property
            .data_line()
            .ok_or_else(|| FcsError::StructuralConfig("empty <property> declaration".to_string()))?;
        let value = property.attribute_as_number("value")?.unwrap_or(0.0);
        if !store.has_node(path) {
            store.set_double(path, value);
        }
    }
    Ok(())
}

/// `<property value=...>` children of a referencing element override the
/// loaded document's interface values.
fn apply_overrides(reference: &Element, store: &dyn PropertyStore) -> Result<()> {
    for property in reference.find_elements("property") {
        let Some(path) = property.data_line() else {
            continue;
        };
        let value = property.attribute_as_number("value")?.unwrap_or(0.0);
        if store.has_node(path) {
            info!(
                "Property {} overridden: {} -> {}",
                path,
                store.get_double(path),
                value
            );
        } else {
            info!("New interface property {} = {}", path, value);
        }
        store.set_double(path, value);
    }
    Ok(())
}

fn assemble_channel(element: &Element, ctx: &BuildContext<'_>) -> Result<Channel> {
    let name = element.attribute_or("name", "unnamed");

    let gate = match element.attribute("execute") {
        Some(property) => Some(ctx.store.get_node(property, false).ok_or_else(|| {
            FcsError::UndefinedEnableProperty {
                channel: name.to_string(),
                property: property.to_string(),
            }
        })?),
        None => None,
    };

    let mut channel = Channel::new(name, gate);
    for child in element.children() {
        match FcsComponent::from_element(child, ctx) {
            Ok(component) => channel.push(component),
            Err(FcsError::UnknownComponentKind(tag)) => {
                warn!("Unknown FCS component <{}> in channel '{}', skipped", tag, name);
            }
            Err(err) => return Err(err),
        }
    }
    debug!(
        "Channel '{}' assembled with {} component(s)",
        name,
        channel.components().len()
    );
    Ok(channel)
}

/// Builds everything a document declares without touching the engine.
pub(crate) fn assemble(
    reference: &Element,
    kind: SystemType,
    config: &FcsConfig,
    ctx: &BuildContext<'_>,
) -> Result<Assembly> {
    let (document, from_file) = resolve_document(reference, config)?;
    let name = document
        .attribute("name")
        .or_else(|| reference.attribute("file"))
        .unwrap_or("unnamed")
        .to_string();

    interface_properties(&document, ctx.store)?;
    if from_file {
        apply_overrides(reference, ctx.store)?;
    }

    let mut assembly = Assembly {
        name,
        ..Default::default()
    };
    for function in document.find_elements("function") {
        if function.attribute("name").is_none() {
            return Err(FcsError::StructuralConfig(format!(
                "{} function in '{}' has no name",
                kind.label(),
                assembly.name
            )));
        }
        let built = Function::from_element(function, ctx.store)?;
        match function.attribute_or("apply_at", "pre") {
            "pre" => assembly.pre_functions.push(built),
            "post" => assembly.post_functions.push(built),
            other => {
                return Err(FcsError::StructuralConfig(format!(
                    "unknown apply_at '{}' on {}",
                    other,
                    function.describe()
                )))
            }
        }
    }

    for channel in document.find_elements("channel") {
        assembly.channels.push(assemble_channel(channel, ctx)?);
    }

    let stale = assembly.channels.iter().map(Channel::lint).sum::<usize>();
    info!(
        "Loaded {} '{}': {} channel(s), {} function(s){}",
        kind.label(),
        assembly.name,
        assembly.channels.len(),
        assembly.pre_functions.len() + assembly.post_functions.len(),
        if stale > 0 {
            format!(", {} stale read(s)", stale)
        } else {
            String::new()
        }
    );
    Ok(assembly)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::PropertyManager;
    use crate::utils::RngManager;
    use std::fs;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> FcsConfig {
        FcsConfig::new(dir.path().join("aircraft"), dir.path().join("library"))
    }

    #[test]
    fn test_search_order_and_extension() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let paths = search_paths("autopilot", &config);
        assert_eq!(paths[0], dir.path().join("aircraft/Systems/autopilot.yaml"));
        assert_eq!(paths[1], dir.path().join("library/autopilot.yaml"));
        assert_eq!(paths[2], dir.path().join("aircraft/autopilot.yaml"));
        assert!(search_paths("yaw-damper.yml", &config)[0].ends_with("yaw-damper.yml"));
    }

    #[test]
    fn test_first_match_wins() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        fs::create_dir_all(dir.path().join("aircraft/Systems")).unwrap();
        fs::create_dir_all(dir.path().join("library")).unwrap();
        fs::write(dir.path().join("library/ap.yaml"), "name: system\n").unwrap();
        assert_eq!(
            find_document("ap", &config).unwrap(),
            dir.path().join("library/ap.yaml")
        );
        fs::write(dir.path().join("aircraft/Systems/ap.yaml"), "name: system\n").unwrap();
        assert_eq!(
            find_document("ap", &config).unwrap(),
            dir.path().join("aircraft/Systems/ap.yaml")
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = find_document("nowhere", &config(&dir)).unwrap_err();
        match err {
            FcsError::FileNotFound { name, searched } => {
                assert_eq!(name, "nowhere");
                assert_eq!(searched.len(), 3);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_reference_without_name_or_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            resolve_document(&Element::new("system"), &config(&dir)),
            Err(FcsError::StructuralConfig(_))
        ));
    }

    #[test]
    fn test_assemble_inline_document() {
        let dir = TempDir::new().unwrap();
        let store = PropertyManager::new();
        let rng = RngManager::default();
        let doc = Element::from_yaml_str(
            r#"
name: system
attributes: { name: yaw-damper }
children:
  - { name: property, attributes: { value: 0.5 }, text: ap/yaw-gain }
  - name: function
    attributes: { name: ap/yaw-gain-doubled, apply_at: post }
    children:
      - name: product
        children: [{ name: p, text: ap/yaw-gain }, { name: v, text: 2 }]
  - name: channel
    attributes: { name: yaw }
    children:
      - name: pure_gain
        attributes: { name: yaw-damper }
        children:
          - { name: input, text: velocities/r-rad_sec }
          - { name: gain, text: ap/yaw-gain }
      - { name: documentation, text: ignored }
"#,
        )
        .unwrap();
        let assembly = assemble(
            &doc,
            SystemType::System,
            &config(&dir),
            &BuildContext::new(&store, &rng),
        )
        .unwrap();

        assert_eq!(assembly.name, "yaw-damper");
        assert_eq!(assembly.channels.len(), 1);
        assert_eq!(assembly.channels[0].components().len(), 1);
        assert_eq!(assembly.post_functions.len(), 1);
        assert!(assembly.pre_functions.is_empty());
        assert_eq!(store.get_double("ap/yaw-gain"), 0.5);
    }

    #[test]
    fn test_undefined_gate_fails() {
        let dir = TempDir::new().unwrap();
        let store = PropertyManager::new();
        let rng = RngManager::default();
        let doc = Element::new("autopilot")
            .with_attribute("name", "ap")
            .with_child(Element::new("channel").with_attribute("execute", "ap/master"));
        let result = assemble(
            &doc,
            SystemType::Autopilot,
            &config(&dir),
            &BuildContext::new(&store, &rng),
        );
        assert!(matches!(result, Err(FcsError::UndefinedEnableProperty { .. })));
    }
}
