// Copyright (c) 2025 xmlview-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! XSD schema and XML view fixtures
//!
//! The schemas model a tiny UI5-like control library: a `sap.m` control
//! schema with an extension chain, a `sap.ui.core.mvc` view schema whose
//! content slot references the controls, and an `urn:example` pair for
//! cross-schema derivation scenarios.

/// Sample XSD schemas for testing
pub struct XsdFixtures;

impl XsdFixtures {
    /// The `sap.m` control schema: ControlType -> ButtonType extension
    /// chain, a Page with a content slot, documented declarations
    pub const fn sap_m() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            xmlns:m="sap.m"
            targetNamespace="sap.m">
  <xsd:complexType name="ControlType">
    <xsd:attribute name="id" type="xsd:string">
      <xsd:annotation>
        <xsd:documentation>Unique control identifier.</xsd:documentation>
      </xsd:annotation>
    </xsd:attribute>
    <xsd:attribute name="visible" type="xsd:boolean">
      <xsd:annotation>
        <xsd:documentation>Whether the control is rendered.</xsd:documentation>
      </xsd:annotation>
    </xsd:attribute>
  </xsd:complexType>
  <xsd:complexType name="ButtonType">
    <xsd:complexContent>
      <xsd:extension base="m:ControlType">
        <xsd:attribute name="text" type="xsd:string">
          <xsd:annotation>
            <xsd:documentation>The text shown on the button.</xsd:documentation>
          </xsd:annotation>
        </xsd:attribute>
        <xsd:attribute name="press" type="xsd:string"/>
      </xsd:extension>
    </xsd:complexContent>
  </xsd:complexType>
  <xsd:complexType name="PageType">
    <xsd:complexContent>
      <xsd:extension base="m:ControlType">
        <xsd:sequence>
          <xsd:element name="content">
            <xsd:complexType>
              <xsd:sequence>
                <xsd:choice>
                  <xsd:element ref="m:Button"/>
                  <xsd:element ref="m:Page"/>
                </xsd:choice>
              </xsd:sequence>
            </xsd:complexType>
          </xsd:element>
        </xsd:sequence>
        <xsd:attribute name="title" type="xsd:string"/>
      </xsd:extension>
    </xsd:complexContent>
  </xsd:complexType>
  <xsd:element name="Button" type="m:ButtonType">
    <xsd:annotation>
      <xsd:documentation>A clickable button control.</xsd:documentation>
    </xsd:annotation>
  </xsd:element>
  <xsd:element name="Page" type="m:PageType">
    <xsd:annotation>
      <xsd:documentation>A page with a content aggregation.</xsd:documentation>
    </xsd:annotation>
  </xsd:element>
</xsd:schema>"#
    }

    /// The `sap.ui.core.mvc` view schema, referencing `sap.m` controls
    /// from its content slot
    pub const fn mvc() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            xmlns:mvc="sap.ui.core.mvc"
            xmlns:m="sap.m"
            targetNamespace="sap.ui.core.mvc">
  <xsd:complexType name="ViewType">
    <xsd:sequence>
      <xsd:element name="content">
        <xsd:complexType>
          <xsd:sequence>
            <xsd:choice>
              <xsd:element ref="m:Button"/>
              <xsd:element ref="m:Page"/>
            </xsd:choice>
          </xsd:sequence>
        </xsd:complexType>
      </xsd:element>
    </xsd:sequence>
    <xsd:attribute name="controllerName" type="xsd:string">
      <xsd:annotation>
        <xsd:documentation>Dot-separated name of the owning controller.</xsd:documentation>
      </xsd:annotation>
    </xsd:attribute>
    <xsd:attribute name="displayBlock" type="xsd:boolean"/>
  </xsd:complexType>
  <xsd:element name="View" type="mvc:ViewType">
    <xsd:annotation>
      <xsd:documentation>The root element of an XML view.</xsd:documentation>
    </xsd:annotation>
  </xsd:element>
</xsd:schema>"#
    }

    /// The `urn:example:core` schema: a base type with a container whose
    /// slot accepts the base element
    pub const fn example_core() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            xmlns:core="urn:example:core"
            targetNamespace="urn:example:core">
  <xsd:complexType name="BaseType">
    <xsd:attribute name="id" type="xsd:string"/>
  </xsd:complexType>
  <xsd:complexType name="ContainerType">
    <xsd:sequence>
      <xsd:element ref="core:Base"/>
    </xsd:sequence>
  </xsd:complexType>
  <xsd:element name="Base" type="core:BaseType"/>
  <xsd:element name="Container" type="core:ContainerType"/>
</xsd:schema>"#
    }

    /// The `urn:example:widgets` schema extending `urn:example:core`
    pub const fn example_widgets() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            xmlns:w="urn:example:widgets"
            xmlns:core="urn:example:core"
            targetNamespace="urn:example:widgets">
  <xsd:complexType name="DerivedType">
    <xsd:complexContent>
      <xsd:extension base="core:BaseType">
        <xsd:attribute name="label" type="xsd:string"/>
      </xsd:extension>
    </xsd:complexContent>
  </xsd:complexType>
  <xsd:element name="Derived" type="w:DerivedType"/>
</xsd:schema>"#
    }
}

/// Sample XML view documents for testing
pub struct ViewFixtures;

impl ViewFixtures {
    /// A small well-formed view with a button inside the content slot
    pub const fn simple_view() -> &'static str {
        r#"<mvc:View xmlns:mvc="sap.ui.core.mvc" xmlns:m="sap.m" controllerName="app.Main">
  <mvc:content>
    <m:Button text="Go" press=".onGo"/>
  </mvc:content>
</mvc:View>"#
    }

    /// A view with the same attribute written twice on one element
    pub const fn view_with_duplicate_attribute() -> &'static str {
        r#"<mvc:View xmlns:mvc="sap.ui.core.mvc" xmlns:m="sap.m">
  <mvc:content>
    <m:Button text="One" text="Two"/>
  </mvc:content>
</mvc:View>"#
    }

    /// A view whose close tag does not match its open tag
    pub const fn view_with_mismatched_tags() -> &'static str {
        r#"<mvc:View xmlns:mvc="sap.ui.core.mvc" xmlns:m="sap.m">
  <mvc:content>
    <m:Button text="One"></m:Page>
  </mvc:content>
</mvc:View>"#
    }

    /// A view declaring a namespace no loaded schema defines
    pub const fn view_with_unknown_namespace() -> &'static str {
        r#"<mvc:View xmlns:mvc="sap.ui.core.mvc" xmlns:m="sap.m" xmlns:f="sap.f">
  <mvc:content>
    <m:Button text="One"/>
  </mvc:content>
</mvc:View>"#
    }

    /// A view binding both `urn:example` namespaces, for derivation
    /// scenarios
    pub const fn example_view() -> &'static str {
        r#"<core:Container xmlns:core="urn:example:core" xmlns:w="urn:example:widgets">
</core:Container>"#
    }
}
