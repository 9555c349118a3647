use flyer_fcs::document::Element;

/// A single pure gain from `in` to `out`.
pub fn create_gain_document(gain: f64) -> Element {
    Element::new("flight_control")
        .with_attribute("name", "test-gain")
        .with_child(
            Element::new("channel").with_attribute("name", "main").with_child(
                Element::new("pure_gain")
                    .with_attribute("name", "test-gain")
                    .with_child(Element::leaf("input", "in"))
                    .with_child(Element::leaf("gain", gain))
                    .with_child(Element::leaf("output", "out")),
            ),
        )
}

/// A pitch channel driving the elevator from the stick, with trim and
/// limits, as a YAML document.
pub const PITCH_DOCUMENT: &str = r#"
name: flight_control
attributes: { name: c172-pitch }
children:
  - name: channel
    attributes: { name: pitch }
    children:
      - name: summer
        attributes: { name: pitch-trim-sum }
        children:
          - { name: input, text: fcs/elevator-cmd-norm }
          - { name: input, text: fcs/pitch-trim-cmd-norm }
          - name: clipto
            children:
              - { name: min, text: -1 }
              - { name: max, text: 1 }
      - name: aerosurface_scale
        attributes: { name: elevator-control }
        children:
          - { name: input, text: fcs/pitch-trim-sum }
          - name: range
            children:
              - { name: min, text: -0.35 }
              - { name: max, text: 0.3 }
          - { name: output, text: fcs/elevator-pos-rad }
      - name: aerosurface_scale
        attributes: { name: elevator-normalized }
        children:
          - { name: input, text: fcs/elevator-pos-rad }
          - name: domain
            children:
              - { name: min, text: -0.35 }
              - { name: max, text: 0.3 }
          - name: range
            children:
              - { name: min, text: -1 }
              - { name: max, text: 1 }
          - { name: output, text: fcs/elevator-pos-norm }
"#;

/// An autopilot with a master switch, an interface gain property and a
/// post function.
pub const AUTOPILOT_DOCUMENT: &str = r#"
name: autopilot
attributes: { name: wing-leveler }
children:
  - { name: property, attributes: { value: 0 }, text: ap/wing-leveler-engage }
  - { name: property, attributes: { value: 2 }, text: ap/roll-gain }
  - name: function
    attributes: { name: ap/roll-error-deg, apply_at: pre }
    children:
      - name: product
        children:
          - { name: p, text: attitude/phi-rad }
          - { name: v, text: 57.29577951308232 }
  - name: function
    attributes: { name: ap/aileron-cmd-doubled, apply_at: post }
    children:
      - name: product
        children:
          - { name: p, text: ap/aileron-cmd }
          - { name: v, text: 2 }
  - name: channel
    attributes: { name: roll-hold, execute: ap/wing-leveler-engage }
    children:
      - name: pure_gain
        attributes: { name: ap/aileron-cmd }
        children:
          - { name: input, text: -ap/roll-error-deg }
          - { name: gain, text: ap/roll-gain }
          - name: clipto
            children:
              - { name: min, text: -10 }
              - { name: max, text: 10 }
      - name: switch
        attributes: { name: ap/engaged-light }
        children:
          - { name: default, attributes: { value: 0 } }
          - { name: test, attributes: { value: 1 }, text: "ap/wing-leveler-engage == 1" }
"#;

/// A system document to be loaded by reference from disk.
pub const YAW_DAMPER_DOCUMENT: &str = r#"
name: system
attributes: { name: yaw-damper }
children:
  - { name: property, attributes: { value: 0.5 }, text: systems/yaw-damper/gain }
  - name: channel
    attributes: { name: yaw-damper }
    children:
      - name: pure_gain
        attributes: { name: systems/yaw-damper/output }
        children:
          - { name: input, text: velocities/r-rad_sec }
          - { name: gain, text: systems/yaw-damper/gain }
"#;

/// A reference element pointing at a document on disk.
pub fn create_file_reference(file: &str) -> Element {
    Element::new("system").with_attribute("file", file)
}
