//! Mining a complete fake source tree end to end.

use std::path::Path;

use serde_json::json;

use networkd_schema_core::{ConfigKind, validate_document};
use networkd_schema_mining::{SourceCheckout, generate_document, mine_config};

const NETWORK_XML: &str = r#"<?xml version="1.0"?>
<refentry xmlns:xi="http://www.w3.org/2001/XInclude">
  <refsect1>
    <title>[Match] Section Options</title>
    <variablelist>
      <varlistentry>
        <term><varname>Name=</varname></term>
        <listitem>
          <para>A whitespace-separated list of interface names.</para>
          <xi:include href="version-info.xml" xpointer="v211"/>
        </listitem>
      </varlistentry>
    </variablelist>
  </refsect1>
  <refsect1>
    <title>[Network] Section Options</title>
    <variablelist>
      <varlistentry>
        <term><varname>IPForward=</varname></term>
        <listitem>
          <para>Takes a boolean argument. Defaults to <literal>no</literal>.</para>
        </listitem>
      </varlistentry>
      <varlistentry>
        <term><varname>LLDP=</varname></term>
        <listitem>
          <para>Controls reception of LLDP packets.</para>
        </listitem>
      </varlistentry>
      <varlistentry>
        <term><varname>ConfigureWithoutCarrier=</varname></term>
        <listitem>
          <para>Only documented, never declared in the parser table.</para>
        </listitem>
      </varlistentry>
    </variablelist>
  </refsect1>
  <refsect1>
    <title>[Route] Section Options</title>
    <variablelist>
      <varlistentry>
        <term><varname>Gateway=</varname></term>
        <listitem>
          <para>The gateway address. This option is mandatory.</para>
        </listitem>
      </varlistentry>
    </variablelist>
  </refsect1>
</refentry>
"#;

const NETWORK_GPERF: &str = r#"struct ConfigPerfItem;
%%
Match.Name,        config_parse_strv,           0, offsetof(Network, match.ifname)
Network.IPForward, config_parse_address_family, 0, offsetof(Network, ip_forward)
Network.LLDP,      config_parse_enum,           0, lldp_mode
Network.DNS,       config_parse_dns_servers,    0, offsetof(Network, dns)
Route.Gateway,     config_parse_gateway,        0, 0
Route.Metric,      config_parse_unsigned,       0, offsetof(Route, metric)
"#;

const LLDP_TABLE_C: &str = r#"
static const char* const lldp_mode_table[] = {
        "no",
        "routers-only",
        "yes",
};
"#;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn fake_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "man/systemd.network.xml", NETWORK_XML);
    write(
        dir.path(),
        "src/network/networkd-network-gperf.gperf",
        NETWORK_GPERF,
    );
    write(dir.path(), "src/network/networkd-lldp.c", LLDP_TABLE_C);
    dir
}

#[test]
fn mines_and_assembles_a_release() {
    let tree = fake_tree();
    let checkout = SourceCheckout::local(tree.path()).unwrap();

    let config = mine_config(checkout.root(), ConfigKind::Network).unwrap();
    let doc = generate_document(&config, "v257");

    assert_eq!(doc["title"], "Systemd network Configuration (v257)");
    assert_eq!(validate_document(&doc), vec![]);

    // Match is a singleton; its strv-parsed Name is an array with the
    // documented description and version marker.
    let name = &doc["properties"]["Match"]["properties"]["Name"];
    assert_eq!(name["type"], "array");
    assert_eq!(name["items"], json!({ "type": "string" }));
    assert_eq!(
        name["description"],
        "A whitespace-separated list of interface names."
    );
    assert_eq!(name["version_added"], "211");

    // Boolean wording plus default mining empties the description.
    let ip_forward = &doc["properties"]["Network"]["properties"]["IPForward"];
    assert_eq!(
        ip_forward,
        &json!({ "type": "boolean", "default": false })
    );

    // The C string table wins for config_parse_enum.
    let lldp = &doc["properties"]["Network"]["properties"]["LLDP"];
    assert_eq!(lldp["enum"], json!(["no", "routers-only", "yes"]));

    // Force-listed DNS wraps its ref element type.
    let dns = &doc["properties"]["Network"]["properties"]["DNS"];
    assert_eq!(dns["type"], "array");
    assert_eq!(dns["items"], json!({ "$ref": "#/definitions/ip_address" }));

    // Route is repeatable, so it gets the oneOf wrapper, and its
    // mandatory Gateway is promoted to required.
    let route = &doc["properties"]["Route"];
    assert_eq!(route["oneOf"][0]["type"], "array");
    assert_eq!(route["oneOf"][1]["required"], json!(["Gateway"]));
    assert_eq!(
        route["oneOf"][1]["properties"]["Gateway"]["allOf"][0],
        json!({ "$ref": "#/definitions/ip_address" })
    );
}

#[test]
fn documented_only_keys_are_backfilled_into_known_sections() {
    let tree = fake_tree();
    let config = mine_config(tree.path(), ConfigKind::Network).unwrap();

    let network = config
        .sections
        .iter()
        .find(|s| s.name == "Network")
        .unwrap();
    let backfilled = network
        .keys
        .iter()
        .find(|k| k.key == "ConfigureWithoutCarrier")
        .unwrap();
    assert_eq!(backfilled.fragment.schema["type"], "string");
    // Backfilled keys come after every parser-table key.
    assert_eq!(network.keys.last().unwrap().key, "ConfigureWithoutCarrier");
}

#[test]
fn summary_reflects_mined_shape() {
    let tree = fake_tree();
    let config = mine_config(tree.path(), ConfigKind::Network).unwrap();
    let summary = config.summary();

    assert_eq!(summary.config, "network");
    assert_eq!(summary.sections, 3);
    assert_eq!(summary.keys, 7);
    assert_eq!(summary.mandatory, 1);
    let rendered = summary.to_string();
    assert!(rendered.contains("Sections: 3"));
    assert!(rendered.contains("String (Enum)"));
}

#[test]
fn missing_parser_table_yields_none() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "man/systemd.netdev.xml", "<refentry/>");
    assert!(mine_config(dir.path(), ConfigKind::Netdev).is_none());
}

#[test]
fn missing_documentation_still_mines_parser_table() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "src/network/link-config-gperf.gperf",
        "Link.MTUBytes, config_parse_iec_size, 0, offsetof(LinkConfig, mtu)\n",
    );

    let config = mine_config(dir.path(), ConfigKind::Link).unwrap();
    let doc = generate_document(&config, "v240");
    assert_eq!(
        doc["properties"]["Link"]["properties"]["MTUBytes"],
        json!({ "$ref": "#/definitions/bytes" })
    );
}
